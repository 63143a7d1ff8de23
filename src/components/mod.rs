//! UI components grouped by feature domain.

mod library;
mod quick_add;
mod status_bar;
mod title_bar;

pub use library::LibraryView;
pub use quick_add::QuickAddModal;
pub use status_bar::{show_status, StatusBar, StatusMessage};
pub use title_bar::TitleBar;
