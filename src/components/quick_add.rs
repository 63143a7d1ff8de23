//! Quick-add popup
//!
//! A small modal surface for jotting a note without touching the page. On
//! open it checks that a watch page is active, asks the watch surface what
//! is playing over the surface bus, and saves through the shared repository;
//! the watch surface is then told to refresh its panel.

use dioxus::prelude::*;
use tracing::debug;

use crate::components::status_bar::{show_status, StatusMessage};
use crate::constants::*;
use crate::core::messages::{SurfaceBus, VideoInfo};
use crate::core::repository::{self, format_time};
use crate::core::store::NoteStore;
use crate::state::AppSettings;
use crate::utils;

#[component]
pub fn QuickAddModal(
    show: Signal<bool>,
    bus: Signal<Option<SurfaceBus>>,
    current_url: Signal<String>,
    settings: Signal<AppSettings>,
) -> Element {
    let store = use_context::<Signal<Option<NoteStore>>>();
    let mut show = show;

    // None while the video info request is in flight
    let mut info = use_signal(|| None::<Result<VideoInfo, String>>);
    let mut text = use_signal(String::new);
    let mut saving = use_signal(|| false);
    let status = use_signal(|| None::<StatusMessage>);
    let status_generation = use_signal(|| 0_u64);

    // (Re)query the watch surface every time the popup opens.
    use_effect(move || {
        if !show() {
            info.set(None);
            text.set(String::new());
            return;
        }
        let url = current_url.peek().clone();
        let marker = settings.peek().site.watch_marker.clone();
        if !utils::is_watch_url(&url, &marker) {
            info.set(Some(Err("Open a watch page to add a note".to_string())));
            return;
        }
        let Some(bus) = bus.peek().clone() else {
            info.set(Some(Err("notes overlay is not reachable".to_string())));
            return;
        };
        spawn(async move {
            info.set(Some(bus.get_video_info().await));
        });
    });

    if !show() {
        return rsx! {};
    }

    let current = info();
    let ready = matches!(&current, Some(Ok(_)));

    let on_save = move |_| {
        let Some(Ok(video)) = info() else {
            return;
        };
        let note_text = text().trim().to_string();
        if note_text.is_empty() {
            show_status(status, status_generation, "Write some note text first", true);
            return;
        }
        let Some(store) = store() else {
            return;
        };
        let Some(bus) = bus.peek().clone() else {
            return;
        };
        saving.set(true);
        spawn(async move {
            let result = repository::add_note(
                &store,
                &video.video_id,
                &video.video_title,
                video.current_time,
                &note_text,
            )
            .await;
            match result {
                Ok(_) => {
                    text.set(String::new());
                    show_status(status, status_generation, "Note saved", false);
                    if !bus.refresh_notes().await {
                        debug!("watch surface did not acknowledge the refresh");
                    }
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
    };

    rsx! {
        div {
            style: "
                position: fixed; top: 0; left: 0; right: 0; bottom: 0;
                background-color: rgba(0, 0, 0, 0.5);
                display: flex; align-items: center; justify-content: center;
                z-index: 2000;
            ",
            onclick: move |_| show.set(false),
            div {
                style: "
                    width: 380px; background-color: {BG_ELEVATED};
                    border: 1px solid {BORDER_DEFAULT}; border-radius: 8px;
                    padding: 20px; box-shadow: 0 10px 25px rgba(0,0,0,0.5);
                    display: flex; flex-direction: column; gap: 12px;
                ",
                onclick: move |event| event.stop_propagation(),

                div {
                    style: "display: flex; align-items: center; justify-content: space-between;",
                    h3 {
                        style: "margin: 0; font-size: 15px; color: {TEXT_PRIMARY};",
                        "Quick add note"
                    }
                    button {
                        style: "
                            background: transparent; border: none; color: {TEXT_DIM};
                            cursor: pointer; font-size: 15px;
                        ",
                        aria_label: "Close",
                        onclick: move |_| show.set(false),
                        "\u{00d7}"
                    }
                }

                {match current {
                    None => rsx! {
                        span { style: "font-size: 12px; color: {TEXT_MUTED};", "Looking up the current video..." }
                    },
                    Some(Err(message)) => rsx! {
                        span { style: "font-size: 12px; color: {ACCENT_ERROR};", "{message}" }
                    },
                    Some(Ok(video)) => rsx! {
                        div {
                            style: "display: flex; flex-direction: column; gap: 4px; font-size: 12px;",
                            div {
                                style: "display: flex; gap: 6px;",
                                span { style: "color: {TEXT_MUTED};", "Video:" }
                                span { style: "color: {TEXT_PRIMARY};", "{video.video_title}" }
                            }
                            div {
                                style: "display: flex; gap: 6px;",
                                span { style: "color: {TEXT_MUTED};", "Current time:" }
                                span {
                                    style: "color: {ACCENT_NOTE}; font-family: 'SF Mono', Consolas, monospace;",
                                    {format_time(video.current_time)}
                                }
                            }
                        }
                    },
                }}

                textarea {
                    rows: "3",
                    placeholder: "Write your note...",
                    style: "
                        width: 100%; box-sizing: border-box; resize: vertical;
                        padding: 6px 8px; font-size: 12px;
                        background-color: {BG_SURFACE}; color: {TEXT_PRIMARY};
                        border: 1px solid {BORDER_DEFAULT}; border-radius: 4px;
                        outline: none;
                    ",
                    disabled: !ready,
                    value: "{text}",
                    oninput: move |event| text.set(event.value()),
                }

                if let Some(message) = status() {
                    span {
                        style: if message.is_error {
                            format!("font-size: 11px; color: {ACCENT_ERROR};")
                        } else {
                            format!("font-size: 11px; color: {ACCENT_OK};")
                        },
                        "{message.text}"
                    }
                }

                div {
                    style: "display: flex; gap: 8px; justify-content: flex-end;",
                    button {
                        style: "
                            padding: 6px 14px; font-size: 12px; cursor: pointer;
                            background-color: {ACCENT_NOTE}; color: white;
                            border: none; border-radius: 4px;
                        ",
                        disabled: !ready || saving(),
                        onclick: on_save,
                        if saving() { "Saving..." } else { "Save note" }
                    }
                    button {
                        style: "
                            padding: 6px 14px; font-size: 12px; cursor: pointer;
                            background-color: {BG_HOVER}; color: {TEXT_PRIMARY};
                            border: none; border-radius: 4px;
                        ",
                        onclick: move |_| show.set(false),
                        "Close"
                    }
                }
            }
        }
    }
}
