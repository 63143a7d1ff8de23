//! Watch surface
//!
//! Renders the watch page (an opaque, site-skinned template) and injects the
//! notes panel into it. The panel host element normally sits parked in a
//! hidden slot; once a video identity is resolved, the injector harvests a
//! DOM skeleton from the live page, resolves the best anchor in Rust, and
//! asks the page script to move the host there. Every navigation source
//! funnels through one dispatcher, and the initial mount retries on a
//! bounded budget while the player is still coming up.

mod add_form;
mod panel;

pub use panel::NotesPanel;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::components::{show_status, StatusMessage};
use crate::constants::*;
use crate::core::anchor::resolve_anchor;
use crate::core::dom::{PageNode, PageSnapshot};
use crate::core::media::{display_title, find_media_file, media_url};
use crate::core::navigation::{
    NavEvent, NavigationSignal, NavigationWatcher, RenderRetry,
};
use crate::core::repository;
use crate::core::store::NoteStore;
use crate::state::{AppSettings, NoteRecord, SiteProfile, WatchSession};
use crate::utils;

const PARKING_ID: &str = "watchnotes-parking";

/// Commands sent into the injector page script.
#[derive(Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum InjectorCommand {
    /// Return the panel host to its hidden parking slot
    Park { host_id: &'static str },
    /// Harvest a DOM skeleton, skipping the panel's own subtree
    Harvest { host_id: &'static str },
    /// Move the panel host to the resolved target
    Mount {
        host_id: &'static str,
        path: Vec<usize>,
        tag: String,
        placement: &'static str,
    },
}

/// Replies coming back from the injector page script.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum InjectorReply {
    Snapshot { nodes: Vec<PageNode> },
    Mounted { ok: bool },
    Parked,
}

/// Commands sent into the player bridge script.
#[derive(Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PlayerCommand {
    Seek { time: f64 },
}

/// Play-head sample streamed from the player bridge script.
#[derive(Deserialize)]
struct PlayerTick {
    time: f64,
}

/// Coalesced DOM mutation ping.
#[derive(Deserialize)]
#[allow(dead_code)]
struct MutationPing {
    mutated: bool,
}

/// Why one mount attempt did not stick. All of these are retried within the
/// budget except a torn-down script.
#[derive(Debug)]
enum MountAbort {
    /// The page has no player element yet; it is still assembling itself
    PlayerMissing,
    /// The snapshot was empty or unanchorable
    NoAnchor,
    /// The host element was missing or the target moved between harvest and
    /// mount
    HostMoved,
    /// The eval channel is gone; retrying cannot help
    ScriptGone,
}

#[component]
pub fn WatchView(
    visible: bool,
    settings: Signal<AppSettings>,
    current_url: Signal<String>,
    // nav_stimulus: a generation counter plus the signal kind that produced
    // it; the app bumps it on internal pushes and back/forward moves
    nav_stimulus: Signal<(u64, NavigationSignal)>,
    session: Signal<WatchSession>,
    playhead: Signal<f64>,
    refresh_tick: Signal<u64>,
    status: Signal<Option<StatusMessage>>,
    status_generation: Signal<u64>,
) -> Element {
    let store = use_context::<Signal<Option<NoteStore>>>();
    let mut refresh_tick = refresh_tick;

    let mut notes = use_signal(|| None::<NoteRecord>);
    let mut form_time = use_signal(|| None::<f64>);
    let saving = use_signal(|| false);
    let mut player_eval = use_signal(|| None::<document::Eval>);

    // All four navigation sources feed this one channel; the dispatcher
    // below is the only consumer.
    let (nav_tx, nav_rx_slot) = use_hook(|| {
        let (tx, rx) = mpsc::unbounded_channel::<NavEvent>();
        (tx, Rc::new(RefCell::new(Some(rx))))
    });

    // Source: app-side navigation (internal pushes and back/forward)
    use_effect({
        let nav_tx = nav_tx.clone();
        move || {
            let (generation, signal) = nav_stimulus();
            if generation == 0 {
                return;
            }
            let url = current_url.peek().clone();
            let _ = nav_tx.send(NavEvent { signal, url });
        }
    });

    // Source: bulk DOM mutations observed in the page
    use_future({
        let nav_tx = nav_tx.clone();
        move || {
            let nav_tx = nav_tx.clone();
            let current_url = current_url.clone();
            async move {
                let mut eval = document::eval(MUTATION_WATCH_SCRIPT);
                loop {
                    match eval.recv::<MutationPing>().await {
                        Ok(_) => {
                            let _ = nav_tx.send(NavEvent {
                                signal: NavigationSignal::DomMutated,
                                url: current_url(),
                            });
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });

    // Source: periodic fallback poll
    use_future({
        let nav_tx = nav_tx.clone();
        move || {
            let nav_tx = nav_tx.clone();
            let current_url = current_url.clone();
            async move {
                let mut interval =
                    tokio::time::interval(Duration::from_millis(NAVIGATION_POLL_INTERVAL_MS));
                loop {
                    interval.tick().await;
                    let _ = nav_tx.send(NavEvent {
                        signal: NavigationSignal::PollTick,
                        url: current_url(),
                    });
                }
            }
        }
    });

    // Player bridge: stream the play-head out, apply seeks in
    use_effect(move || {
        if player_eval().is_some() {
            return;
        }
        player_eval.set(Some(document::eval(PLAYER_BRIDGE_SCRIPT)));
    });

    use_future(move || {
        let player_eval = player_eval.clone();
        let mut playhead = playhead.clone();
        async move {
            loop {
                let Some(eval) = player_eval() else {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                };
                let mut eval = eval;
                loop {
                    match eval.recv::<PlayerTick>().await {
                        Ok(tick) => playhead.set(tick.time),
                        Err(_) => break,
                    }
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    });

    // The dispatcher: one consumer, one watcher, one injector script.
    use_future({
        let nav_rx_slot = nav_rx_slot.clone();
        move || {
            let nav_rx_slot = nav_rx_slot.clone();
            let mut session = session.clone();
            let mut form_time = form_time.clone();
            let settings = settings.clone();
            let player_eval = player_eval.clone();
            async move {
                let Some(mut rx) = nav_rx_slot.borrow_mut().take() else {
                    return;
                };
                let mut watcher = NavigationWatcher::new();
                let mut injector = document::eval(INJECTOR_SCRIPT);

                while let Some(event) = rx.recv().await {
                    let site = settings.peek().site.clone();
                    let Some(change) = watcher.observe(event.signal, &event.url, &site) else {
                        continue;
                    };
                    let video_id = change.video_id;
                    debug!(%video_id, signal = ?event.signal, "video identity changed");

                    // Park the panel before the page re-renders underneath it.
                    let _ = injector.send(InjectorCommand::Park {
                        host_id: PANEL_HOST_ID,
                    });
                    wait_for_parked(&mut injector).await;

                    // Resolve media and titles for the new video.
                    let media_dir = settings.peek().media_dir.clone();
                    let media_file = {
                        let video_id = video_id.clone();
                        tokio::task::spawn_blocking(move || find_media_file(&media_dir, &video_id))
                            .await
                            .unwrap_or(None)
                    };
                    let title = display_title(media_file.as_deref(), &video_id);
                    let page_title = format!("{}{}", title, site.title_suffix);
                    if let Ok(encoded) = serde_json::to_string(&page_title) {
                        let _ = document::eval(&format!("document.title = {encoded};"));
                    }

                    {
                        let mut session = session.write();
                        session.video_id = Some(video_id.clone());
                        session.page_title = page_title;
                        session.media_src = media_file.as_deref().map(media_url);
                        session.pending_start = utils::parse_start_time(&event.url);
                    }
                    form_time.set(None);

                    // Mount with a bounded retry; the player may still be
                    // coming up.
                    let mut retry = RenderRetry::new(RENDER_MAX_ATTEMPTS);
                    let mut mounted = false;
                    while retry.next_attempt() {
                        tokio::time::sleep(Duration::from_millis(RENDER_RETRY_DELAY_MS)).await;
                        match attempt_mount(&mut injector, &site).await {
                            Ok(()) => {
                                mounted = true;
                                break;
                            }
                            Err(MountAbort::ScriptGone) => {
                                debug!("injector script torn down, giving up");
                                break;
                            }
                            Err(abort) => {
                                debug!(?abort, "panel mount attempt failed");
                            }
                        }
                    }

                    if mounted {
                        watcher.mark_rendered(&video_id);
                        let start = session.peek().pending_start;
                        if let Some(start) = start {
                            if let Some(player) = player_eval.peek().clone() {
                                let _ = player.send(PlayerCommand::Seek { time: start });
                            }
                            session.write().pending_start = None;
                        }
                    }
                    // On failure the panel stays parked and invisible; the
                    // page must keep working without it.
                }
            }
        }
    });

    // Reload the note list whenever the video or the store contents change.
    use_effect(move || {
        let _ = refresh_tick();
        let video_id = session.read().video_id.clone();
        let Some(video_id) = video_id else {
            notes.set(None);
            return;
        };
        let Some(store) = store() else {
            return;
        };
        spawn(async move {
            match store.get(&video_id).await {
                Ok(record) => notes.set(record),
                Err(err) => debug!(%err, "note reload failed"),
            }
        });
    });

    // Panel callbacks
    let on_seek = move |time: f64| {
        if let Some(player) = player_eval() {
            let _ = player.send(PlayerCommand::Seek { time });
        }
    };

    let on_toggle_form = move |_| {
        if form_time().is_some() {
            form_time.set(None);
        } else {
            // Capture the live play-head the moment the form opens
            form_time.set(Some(playhead()));
        }
    };

    let on_save = {
        let mut saving = saving.clone();
        move |text: String| {
            let Some(time) = form_time() else {
                return;
            };
            let Some(store) = store() else {
                return;
            };
            let Some(video_id) = session.peek().video_id.clone() else {
                return;
            };
            let page_title = session.peek().page_title.clone();
            let suffix = settings.peek().site.title_suffix.clone();
            let title = utils::strip_title_suffix(&page_title, &suffix).to_string();

            saving.set(true);
            spawn(async move {
                match repository::add_note(&store, &video_id, &title, time, &text).await {
                    Ok(_) => {
                        form_time.set(None);
                        refresh_tick.set(refresh_tick() + 1);
                        show_status(status, status_generation, "Note saved", false);
                    }
                    Err(err) => {
                        show_status(
                            status,
                            status_generation,
                            format!("Could not save note: {err}"),
                            true,
                        );
                    }
                }
                saving.set(false);
            });
        }
    };

    let on_delete = move |index: usize| {
        let Some(store) = store() else {
            return;
        };
        let Some(video_id) = session.peek().video_id.clone() else {
            return;
        };
        spawn(async move {
            match repository::delete_note(&store, &video_id, index).await {
                Ok(_) => refresh_tick.set(refresh_tick() + 1),
                Err(err) => {
                    show_status(
                        status,
                        status_generation,
                        format!("Could not delete note: {err}"),
                        true,
                    );
                }
            }
        });
    };

    // The page markup is site content, substituted and escaped up front.
    let page_html = use_memo(move || {
        let session_value = session.read();
        session_value.video_id.as_ref()?;
        let suffix = settings.read().site.title_suffix.clone();
        let title = utils::strip_title_suffix(&session_value.page_title, &suffix).to_string();
        Some(
            WATCH_PAGE_TEMPLATE
                .replace("{{SRC}}", &session_value.media_src.clone().unwrap_or_default())
                .replace("{{TITLE}}", &utils::escape_html(&title)),
        )
    });

    let video_key = session.read().video_id.clone().unwrap_or_default();
    let outer_style = if visible {
        format!("flex: 1; overflow-y: auto; padding: 16px; background-color: {BG_BASE};")
    } else {
        "display: none;".to_string()
    };

    rsx! {
        div {
            style: "{outer_style}",
            if let Some(html) = page_html() {
                div {
                    key: "{video_key}",
                    style: "max-width: 1100px; margin: 0 auto;",
                    dangerous_inner_html: "{html}",
                }
            } else {
                div {
                    style: "
                        display: flex; flex-direction: column; align-items: center;
                        justify-content: center; height: 100%; gap: 8px;
                        color: {TEXT_MUTED}; font-size: 13px;
                    ",
                    span { "No video open." }
                    span { "Enter a video id above, or jump to one from the library." }
                }
            }
            // Hidden slot the panel host lives in until the injector finds
            // it a real home inside the page.
            div {
                id: PARKING_ID,
                style: "display: none;",
                div {
                    id: PANEL_HOST_ID,
                    NotesPanel {
                        record: notes(),
                        form_time: form_time(),
                        saving,
                        on_seek,
                        on_delete,
                        on_toggle_form,
                        on_save,
                        on_cancel: move |_| form_time.set(None),
                    }
                }
            }
        }
    }
}

/// Drain injector replies until the park acknowledgment arrives.
async fn wait_for_parked(injector: &mut document::Eval) {
    loop {
        match injector.recv::<InjectorReply>().await {
            Ok(InjectorReply::Parked) => return,
            Ok(_) => continue,
            Err(_) => return,
        }
    }
}

/// One harvest-resolve-mount round trip.
async fn attempt_mount(
    injector: &mut document::Eval,
    site: &SiteProfile,
) -> Result<(), MountAbort> {
    injector
        .send(InjectorCommand::Harvest {
            host_id: PANEL_HOST_ID,
        })
        .map_err(|_| MountAbort::ScriptGone)?;

    let nodes = loop {
        match injector.recv::<InjectorReply>().await {
            Ok(InjectorReply::Snapshot { nodes }) => break nodes,
            Ok(_) => continue,
            Err(_) => return Err(MountAbort::ScriptGone),
        }
    };

    let doc = PageSnapshot::from_nodes(nodes);
    let player_present = site.player_tags.iter().any(|tag| doc.has_tag(tag))
        || site.player_ids.iter().any(|id| doc.find_by_id(id).is_some());
    if !player_present {
        return Err(MountAbort::PlayerMissing);
    }

    let insertion = resolve_anchor(&doc, site).ok_or(MountAbort::NoAnchor)?;
    injector
        .send(InjectorCommand::Mount {
            host_id: PANEL_HOST_ID,
            path: doc.path(insertion.target),
            tag: doc.node(insertion.target).tag.clone(),
            placement: insertion.placement.as_str(),
        })
        .map_err(|_| MountAbort::ScriptGone)?;

    loop {
        match injector.recv::<InjectorReply>().await {
            Ok(InjectorReply::Mounted { ok: true }) => return Ok(()),
            Ok(InjectorReply::Mounted { ok: false }) => return Err(MountAbort::HostMoved),
            Ok(_) => continue,
            Err(_) => return Err(MountAbort::ScriptGone),
        }
    }
}
