//! State management module
//!
//! Core data structures for the application:
//! - Note / NoteRecord: the persisted note model, keyed by video id
//! - AppSettings / SiteProfile: configuration and the host-page contract
//! - WatchSession: per-page-load state of the watch surface

mod note;
mod session;
mod settings;

pub use note::{Note, NoteRecord};
pub use session::WatchSession;
pub use settings::{AppSettings, SiteProfile};
