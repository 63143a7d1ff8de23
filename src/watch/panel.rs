//! The notes panel rendered into the watch page.

use dioxus::prelude::*;

use crate::constants::*;
use crate::core::repository::format_time;
use crate::state::NoteRecord;
use crate::watch::add_form::AddNoteForm;

/// Panel body: empty state or collapsible note list, plus the add-note form
/// when it is open. Where this element sits in the page is the injector's
/// business, not the panel's.
#[component]
pub fn NotesPanel(
    record: Option<NoteRecord>,
    // form_time: playback time captured when the form opened; None = closed
    form_time: Option<f64>,
    saving: Signal<bool>,
    on_seek: EventHandler<f64>,
    on_delete: EventHandler<usize>,
    on_toggle_form: EventHandler<()>,
    on_save: EventHandler<String>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut collapsed = use_signal(|| false);
    let mut pending_delete = use_signal(|| None::<usize>);

    let notes = record
        .as_ref()
        .map(|record| record.notes.clone())
        .unwrap_or_default();
    let count = notes.len();

    rsx! {
        div {
            style: "
                margin: 12px 0; padding: 12px;
                background-color: {BG_ELEVATED};
                border: 1px solid {BORDER_DEFAULT}; border-radius: 8px;
                font-size: 13px; color: {TEXT_PRIMARY};
            ",

            if count == 0 {
                div {
                    style: "display: flex; flex-direction: column; gap: 6px;",
                    p { style: "margin: 0; color: {TEXT_MUTED};", "No notes yet." }
                    button {
                        style: "
                            align-self: flex-start; padding: 4px 10px;
                            background-color: {BG_SURFACE}; color: {TEXT_PRIMARY};
                            border: 1px solid {BORDER_STRONG}; border-radius: 4px;
                            cursor: pointer; font-size: 12px;
                        ",
                        onclick: move |_| on_toggle_form.call(()),
                        "+ Add note"
                    }
                }
            } else {
                div {
                    style: "
                        display: flex; align-items: center; justify-content: space-between;
                        margin-bottom: 8px;
                    ",
                    div {
                        style: "display: flex; align-items: center; gap: 8px;",
                        h3 {
                            style: "margin: 0; font-size: 13px; font-weight: 600;",
                            "Notes ({count})"
                        }
                        button {
                            style: "
                                background: transparent; border: none; cursor: pointer;
                                color: {TEXT_SECONDARY}; font-size: 11px; padding: 2px;
                            ",
                            aria_label: "Collapse note list",
                            aria_expanded: if collapsed() { "false" } else { "true" },
                            onclick: move |_| collapsed.set(!collapsed()),
                            if collapsed() { "\u{25b6}" } else { "\u{25bc}" }
                        }
                    }
                    button {
                        style: "
                            padding: 4px 10px; background-color: {BG_SURFACE};
                            color: {TEXT_PRIMARY}; border: 1px solid {BORDER_STRONG};
                            border-radius: 4px; cursor: pointer; font-size: 12px;
                        ",
                        aria_label: "Add a note",
                        onclick: move |_| on_toggle_form.call(()),
                        "+ Add note"
                    }
                }
            }

            if let Some(time) = form_time {
                AddNoteForm {
                    time_label: format_time(time),
                    saving,
                    on_save: move |text| on_save.call(text),
                    on_cancel: move |_| on_cancel.call(()),
                }
            }

            if count > 0 && !collapsed() {
                div {
                    style: "display: flex; flex-direction: column; gap: 6px;",
                    {notes.iter().enumerate().map(|(index, note)| {
                        let label = if note.timestamp_text.is_empty() {
                            format_time(note.time)
                        } else {
                            note.timestamp_text.clone()
                        };
                        let time = note.time;
                        let text = note.text.clone();
                        rsx! {
                                div {
                                    key: "{index}-{time}",
                                    style: "
                                        display: flex; align-items: flex-start; gap: 8px;
                                        padding: 6px 8px; border-radius: 6px;
                                        background-color: {BG_SURFACE};
                                        border: 1px solid {BORDER_SUBTLE};
                                    ",
                                    button {
                                        style: "
                                            flex-shrink: 0; padding: 2px 6px;
                                            background: transparent; border: none;
                                            color: {ACCENT_NOTE}; cursor: pointer;
                                            font-family: 'SF Mono', Consolas, monospace;
                                            font-size: 12px;
                                        ",
                                        onclick: move |_| on_seek.call(time),
                                        "{label}"
                                    }
                                    div {
                                        style: "
                                            flex: 1; white-space: pre-wrap;
                                            word-break: break-word; color: {TEXT_PRIMARY};
                                        ",
                                        "{text}"
                                    }
                                    if pending_delete() == Some(index) {
                                        div {
                                            style: "display: flex; align-items: center; gap: 4px; flex-shrink: 0;",
                                            span { style: "font-size: 11px; color: {TEXT_MUTED};", "Delete?" }
                                            button {
                                                style: "
                                                    padding: 2px 6px; font-size: 11px; cursor: pointer;
                                                    background-color: {ACCENT_ERROR}; color: white;
                                                    border: none; border-radius: 3px;
                                                ",
                                                onclick: move |_| {
                                                    pending_delete.set(None);
                                                    on_delete.call(index);
                                                },
                                                "Delete"
                                            }
                                            button {
                                                style: "
                                                    padding: 2px 6px; font-size: 11px; cursor: pointer;
                                                    background-color: {BG_HOVER}; color: {TEXT_PRIMARY};
                                                    border: none; border-radius: 3px;
                                                ",
                                                onclick: move |_| pending_delete.set(None),
                                                "Keep"
                                            }
                                        }
                                    } else {
                                        button {
                                            style: "
                                                flex-shrink: 0; background: transparent; border: none;
                                                color: {TEXT_DIM}; cursor: pointer; font-size: 13px;
                                            ",
                                            aria_label: "Delete this note",
                                            title: "Delete this note",
                                            onclick: move |_| pending_delete.set(Some(index)),
                                            "\u{00d7}"
                                        }
                                    }
                                }
                            }
                        })}
                }
            }
        }
    }
}
