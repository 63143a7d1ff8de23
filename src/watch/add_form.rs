//! Inline add-note form.
//!
//! The playback time shown here was captured by the parent at the moment the
//! form opened; keeping the player running while typing does not move the
//! note.

use dioxus::prelude::*;

use crate::constants::*;

const NOTE_INPUT_ID: &str = "watchnotes-note-input";

#[component]
pub fn AddNoteForm(
    time_label: String,
    saving: Signal<bool>,
    on_save: EventHandler<String>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut text = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    rsx! {
        div {
            style: "
                margin: 8px 0; padding: 10px;
                background-color: {BG_SURFACE};
                border: 1px solid {BORDER_STRONG}; border-radius: 6px;
                display: flex; flex-direction: column; gap: 8px;
            ",
            div {
                style: "display: flex; align-items: center; justify-content: space-between;",
                h4 { style: "margin: 0; font-size: 12px; color: {TEXT_PRIMARY};", "Add a note" }
                button {
                    style: "
                        background: transparent; border: none; color: {TEXT_DIM};
                        cursor: pointer; font-size: 14px;
                    ",
                    aria_label: "Close the form",
                    onclick: move |_| on_cancel.call(()),
                    "\u{00d7}"
                }
            }
            div {
                style: "display: flex; gap: 6px; font-size: 11px;",
                span { style: "color: {TEXT_MUTED};", "Current time:" }
                span {
                    style: "color: {ACCENT_NOTE}; font-family: 'SF Mono', Consolas, monospace;",
                    "{time_label}"
                }
            }
            textarea {
                id: NOTE_INPUT_ID,
                rows: "2",
                placeholder: "Write your note...",
                style: "
                    width: 100%; box-sizing: border-box; resize: vertical;
                    padding: 6px 8px; font-size: 12px;
                    background-color: {BG_ELEVATED}; color: {TEXT_PRIMARY};
                    border: 1px solid {BORDER_DEFAULT}; border-radius: 4px;
                    outline: none;
                ",
                value: "{text}",
                oninput: move |event| text.set(event.value()),
                onmounted: move |_| {
                    let _ = document::eval(&format!(
                        "const el = document.getElementById('{NOTE_INPUT_ID}'); if (el) el.focus();"
                    ));
                },
            }
            if let Some(message) = error() {
                span { style: "font-size: 11px; color: {ACCENT_ERROR};", "{message}" }
            }
            div {
                style: "display: flex; gap: 8px;",
                button {
                    style: "
                        padding: 5px 12px; font-size: 12px; cursor: pointer;
                        background-color: {ACCENT_NOTE}; color: white;
                        border: none; border-radius: 4px;
                    ",
                    disabled: saving(),
                    onclick: move |_| {
                        let value = text().trim().to_string();
                        if value.is_empty() {
                            error.set(Some("Write some note text first".to_string()));
                            return;
                        }
                        error.set(None);
                        on_save.call(value);
                    },
                    if saving() { "Saving..." } else { "Save" }
                }
                button {
                    style: "
                        padding: 5px 12px; font-size: 12px; cursor: pointer;
                        background-color: {BG_HOVER}; color: {TEXT_PRIMARY};
                        border: none; border-radius: 4px;
                    ",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
