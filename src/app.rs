//! Root application component
//!
//! Owns the cross-surface state: the note store handle, the surface bus, the
//! in-app navigation history, the watch session, and the transient status
//! line. The watch and library surfaces render side by side and are toggled
//! by visibility so their state survives view switches.

use std::path::Path;

use dioxus::prelude::*;
use tracing::warn;

use crate::components::{LibraryView, QuickAddModal, StatusBar, StatusMessage, TitleBar};
use crate::constants::*;
use crate::core::error::NotesError;
use crate::core::messages::{SurfaceBus, SurfaceRequest, VideoInfo};
use crate::core::navigation::NavigationSignal;
use crate::core::store::NoteStore;
use crate::state::{AppSettings, WatchSession};
use crate::utils;
use crate::watch::WatchView;

const SETTINGS_PATH: &str = "watchnotes.settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainView {
    Watch,
    Library,
}

/// Push a new entry onto the in-app history and stimulate the watch
/// surface's navigation dispatcher.
fn navigate(
    mut history: Signal<Vec<String>>,
    mut history_position: Signal<usize>,
    mut current_url: Signal<String>,
    mut view: Signal<MainView>,
    mut nav_stimulus: Signal<(u64, NavigationSignal)>,
    url: String,
) {
    {
        let mut history = history.write();
        if !history.is_empty() {
            let position = *history_position.peek();
            history.truncate(position + 1);
        }
        history.push(url.clone());
    }
    let last = history.peek().len() - 1;
    history_position.set(last);
    current_url.set(url);
    view.set(MainView::Watch);
    let generation = nav_stimulus.peek().0;
    nav_stimulus.set((generation + 1, NavigationSignal::HistoryChanged));
}

/// Move within the existing history (back/forward buttons).
fn navigate_history(
    history: Signal<Vec<String>>,
    mut history_position: Signal<usize>,
    mut current_url: Signal<String>,
    mut view: Signal<MainView>,
    mut nav_stimulus: Signal<(u64, NavigationSignal)>,
    new_position: usize,
) {
    let url = {
        let history = history.read();
        match history.get(new_position) {
            Some(url) => url.clone(),
            None => return,
        }
    };
    history_position.set(new_position);
    current_url.set(url);
    view.set(MainView::Watch);
    let generation = nav_stimulus.peek().0;
    nav_stimulus.set((generation + 1, NavigationSignal::HistoryPopped));
}

/// Main application component
#[component]
pub fn App() -> Element {
    let settings = use_signal(|| AppSettings::load_or_default(Path::new(SETTINGS_PATH)));
    let store = use_signal(|| None::<NoteStore>);
    use_context_provider(|| store);

    let mut view = use_signal(|| MainView::Watch);
    let session = use_signal(WatchSession::default);
    let playhead = use_signal(|| 0.0_f64);
    let refresh_tick = use_signal(|| 0_u64);
    let status = use_signal(|| None::<StatusMessage>);
    let status_generation = use_signal(|| 0_u64);
    let current_url = use_signal(String::new);
    let nav_stimulus = use_signal(|| (0_u64, NavigationSignal::PollTick));
    let history = use_signal(Vec::<String>::new);
    let history_position = use_signal(|| 0_usize);
    let surface_bus = use_signal(|| None::<SurfaceBus>);
    let mut quick_add_open = use_signal(|| false);

    // Open the note store; materialize default settings on first run so the
    // user has a file to edit.
    use_future(move || {
        let settings = settings.clone();
        let mut store = store.clone();
        async move {
            let store_path = settings.peek().store_path.clone();
            match NoteStore::open(&store_path).await {
                Ok(opened) => store.set(Some(opened)),
                Err(err) => warn!(%err, "could not open the note store"),
            }
            if !Path::new(SETTINGS_PATH).exists() {
                let snapshot = settings.peek().clone();
                let _ = tokio::task::spawn_blocking(move || {
                    snapshot.save_to(Path::new(SETTINGS_PATH))
                })
                .await;
            }
        }
    });

    // Surface bus: the popup's window into the watch surface.
    use_future(move || {
        let mut surface_bus = surface_bus.clone();
        let session = session.clone();
        let playhead = playhead.clone();
        let settings = settings.clone();
        let mut refresh_tick = refresh_tick.clone();
        async move {
            let (bus, mut requests) = SurfaceBus::channel();
            surface_bus.set(Some(bus));
            while let Some(request) = requests.recv().await {
                match request {
                    SurfaceRequest::GetVideoInfo { reply } => {
                        let session_value = session.peek().clone();
                        let response = match session_value.video_id {
                            Some(video_id) => {
                                let suffix = settings.peek().site.title_suffix.clone();
                                Ok(VideoInfo {
                                    video_id,
                                    current_time: *playhead.peek(),
                                    video_title: utils::strip_title_suffix(
                                        &session_value.page_title,
                                        &suffix,
                                    )
                                    .to_string(),
                                })
                            }
                            None => Err(NotesError::NoVideo.to_string()),
                        };
                        let _ = reply.send(response);
                    }
                    SurfaceRequest::RefreshNotes { reply } => {
                        let next = *refresh_tick.peek() + 1;
                        refresh_tick.set(next);
                        let _ = reply.send(());
                    }
                }
            }
        }
    });

    let can_back = history_position() > 0 && !history().is_empty();
    let can_forward = !history().is_empty() && history_position() + 1 < history().len();

    rsx! {
        style { "{GLOBAL_CSS}" }
        div {
            style: "
                display: flex; flex-direction: column; height: 100vh;
                background-color: {BG_DEEPEST}; color: {TEXT_PRIMARY};
                font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
            ",
            TitleBar {
                library_active: view() == MainView::Library,
                can_back,
                can_forward,
                on_back: move |_| {
                    let position = *history_position.peek();
                    if position > 0 {
                        navigate_history(
                            history,
                            history_position,
                            current_url,
                            view,
                            nav_stimulus,
                            position - 1,
                        );
                    }
                },
                on_forward: move |_| {
                    let position = *history_position.peek();
                    navigate_history(
                        history,
                        history_position,
                        current_url,
                        view,
                        nav_stimulus,
                        position + 1,
                    );
                },
                on_navigate: move |url| {
                    navigate(
                        history,
                        history_position,
                        current_url,
                        view,
                        nav_stimulus,
                        url,
                    );
                },
                on_toggle_library: move |_| {
                    view.set(match view() {
                        MainView::Library => MainView::Watch,
                        MainView::Watch => MainView::Library,
                    });
                },
                on_quick_add: move |_| quick_add_open.set(true),
            }
            div {
                style: "flex: 1; display: flex; overflow: hidden;",
                WatchView {
                    visible: view() == MainView::Watch,
                    settings,
                    current_url,
                    nav_stimulus,
                    session,
                    playhead,
                    refresh_tick,
                    status,
                    status_generation,
                }
                LibraryView {
                    visible: view() == MainView::Library,
                    settings,
                    on_jump: move |url| {
                        navigate(
                            history,
                            history_position,
                            current_url,
                            view,
                            nav_stimulus,
                            url,
                        );
                    },
                    status,
                    status_generation,
                }
            }
            QuickAddModal {
                show: quick_add_open,
                bus: surface_bus,
                current_url,
                settings,
            }
            StatusBar { status, session, playhead }
        }
    }
}
