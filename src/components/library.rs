//! Library surface
//!
//! Lists every stored note across all videos: flattened most-recent-first,
//! grouped per video for display, each timestamp linking back into the
//! source video at its offset. Subscribes to store changes so edits made on
//! other surfaces appear without a manual refresh. Note text is rendered as
//! text nodes only, never interpolated into markup.

use std::collections::HashMap;
use std::time::Duration;

use dioxus::prelude::*;
use tracing::{debug, warn};

use crate::components::status_bar::{show_status, StatusMessage};
use crate::constants::*;
use crate::core::repository::format_time;
use crate::core::store::NoteStore;
use crate::state::{AppSettings, NoteRecord};
use crate::utils;

/// One note annotated with its parent video, the unit of the flattened view.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    pub video_id: String,
    pub video_title: String,
    pub time: f64,
    pub text: String,
    pub timestamp_text: String,
    pub created_at: i64,
}

/// Flatten every video's notes into one sequence, most recently created
/// first. Missing labels are re-derived from the time.
pub fn flatten_notes(records: &HashMap<String, NoteRecord>) -> Vec<LibraryEntry> {
    let mut entries: Vec<LibraryEntry> = records
        .iter()
        .flat_map(|(video_id, record)| {
            record.notes.iter().map(move |note| LibraryEntry {
                video_id: video_id.clone(),
                video_title: if record.title.is_empty() {
                    "Untitled video".to_string()
                } else {
                    record.title.clone()
                },
                time: note.time,
                text: note.text.clone(),
                timestamp_text: if note.timestamp_text.is_empty() {
                    format_time(note.time)
                } else {
                    note.timestamp_text.clone()
                },
                created_at: note.created_at,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries
}

/// A video's slice of the flattened view.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoGroup {
    pub video_id: String,
    pub title: String,
    pub notes: Vec<LibraryEntry>,
}

/// Group flattened entries by video. Group order follows first encounter in
/// the input (i.e. recency); within a group, notes re-sort by time for
/// display.
pub fn group_by_video(entries: &[LibraryEntry]) -> Vec<VideoGroup> {
    let mut groups: Vec<VideoGroup> = Vec::new();
    for entry in entries {
        match groups
            .iter_mut()
            .find(|group| group.video_id == entry.video_id)
        {
            Some(group) => group.notes.push(entry.clone()),
            None => groups.push(VideoGroup {
                video_id: entry.video_id.clone(),
                title: entry.video_title.clone(),
                notes: vec![entry.clone()],
            }),
        }
    }
    for group in &mut groups {
        group.notes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
    groups
}

fn created_label(created_at: i64) -> Option<String> {
    if created_at <= 0 {
        return None;
    }
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(created_at)
        .map(|stamp| stamp.format("%b %d, %Y %H:%M").to_string())
}

#[component]
pub fn LibraryView(
    visible: bool,
    settings: Signal<AppSettings>,
    on_jump: EventHandler<String>,
    status: Signal<Option<StatusMessage>>,
    status_generation: Signal<u64>,
) -> Element {
    let store = use_context::<Signal<Option<NoteStore>>>();

    let mut entries = use_signal(Vec::<LibraryEntry>::new);
    let mut loading = use_signal(|| true);

    // Initial load plus auto-refresh on every store change.
    use_future(move || {
        let store = store.clone();
        let mut entries = entries.clone();
        let mut loading = loading.clone();
        async move {
            loop {
                let Some(store) = store() else {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                };
                let mut changes = store.subscribe();
                loop {
                    match store.get_all().await {
                        Ok(all) => {
                            entries.set(flatten_notes(&all));
                            loading.set(false);
                        }
                        Err(err) => debug!(%err, "library load failed"),
                    }
                    if changes.changed().await.is_err() {
                        break;
                    }
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    });

    let on_export = move |_| {
        let Some(store) = store() else {
            return;
        };
        spawn(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .set_file_name("watchnotes-export.json")
                .add_filter("JSON", &["json"])
                .save_file()
                .await
            else {
                return;
            };
            let path = file.path().to_path_buf();
            let result = async {
                let all = store.get_all().await?;
                let json = serde_json::to_string_pretty(&all)
                    .map_err(crate::core::error::NotesError::from)?;
                tokio::task::spawn_blocking(move || std::fs::write(&path, json))
                    .await
                    .map_err(|err| crate::core::error::NotesError::Storage(err.to_string()))?
                    .map_err(crate::core::error::NotesError::from)
            }
            .await;
            match result {
                Ok(()) => show_status(status, status_generation, "Notes exported", false),
                Err(err) => {
                    warn!(%err, "note export failed");
                    show_status(
                        status,
                        status_generation,
                        format!("Export failed: {err}"),
                        true,
                    );
                }
            }
        });
    };

    let groups = group_by_video(&entries());
    let watch_base = settings.read().site.watch_base.clone();
    let outer_style = if visible {
        format!("flex: 1; overflow-y: auto; padding: 20px; background-color: {BG_BASE};")
    } else {
        "display: none;".to_string()
    };

    rsx! {
        div {
            style: "{outer_style}",
            div {
                style: "max-width: 760px; margin: 0 auto; display: flex; flex-direction: column; gap: 16px;",
                div {
                    style: "display: flex; align-items: center; justify-content: space-between;",
                    h2 {
                        style: "margin: 0; font-size: 16px; color: {TEXT_PRIMARY};",
                        "All notes"
                    }
                    button {
                        style: "
                            padding: 4px 10px; font-size: 12px; cursor: pointer;
                            background-color: {BG_SURFACE}; color: {TEXT_PRIMARY};
                            border: 1px solid {BORDER_STRONG}; border-radius: 4px;
                        ",
                        onclick: on_export,
                        "Export notes"
                    }
                }

                if loading() {
                    span { style: "font-size: 12px; color: {TEXT_MUTED};", "Loading notes..." }
                } else if groups.is_empty() {
                    span {
                        style: "font-size: 13px; color: {TEXT_MUTED};",
                        "No notes yet. Open a video and add one."
                    }
                } else {
                    {groups.iter().map(|group| {
                        let count = group.notes.len();
                        let note_word = if count == 1 { "note" } else { "notes" };
                        rsx! {
                            div {
                                key: "{group.video_id}",
                                style: "
                                    display: flex; flex-direction: column; gap: 8px;
                                    padding: 14px; border-radius: 8px;
                                    background-color: {BG_ELEVATED};
                                    border: 1px solid {BORDER_DEFAULT};
                                ",
                                div {
                                    style: "display: flex; align-items: baseline; justify-content: space-between; gap: 8px;",
                                    h3 {
                                        style: "margin: 0; font-size: 13px; color: {TEXT_PRIMARY};",
                                        "{group.title}"
                                    }
                                    span {
                                        style: "font-size: 11px; color: {TEXT_DIM}; flex-shrink: 0;",
                                        "{count} {note_word}"
                                    }
                                }
                                {group.notes.iter().map(|entry| {
                                    let jump_url = utils::watch_url_with_time(
                                        &watch_base,
                                        &entry.video_id,
                                        entry.time,
                                    );
                                    let label = entry.timestamp_text.clone();
                                    let text = entry.text.clone();
                                    let created = created_label(entry.created_at);
                                    rsx! {
                                        div {
                                            key: "{entry.video_id}-{entry.time}-{entry.created_at}",
                                            style: "
                                                display: flex; align-items: flex-start; gap: 10px;
                                                padding: 6px 8px; border-radius: 6px;
                                                background-color: {BG_SURFACE};
                                            ",
                                            button {
                                                style: "
                                                    flex-shrink: 0; padding: 2px 6px;
                                                    background: transparent; border: none;
                                                    color: {ACCENT_NOTE}; cursor: pointer;
                                                    font-family: 'SF Mono', Consolas, monospace;
                                                    font-size: 12px;
                                                ",
                                                title: "Open the video at this time",
                                                onclick: move |_| on_jump.call(jump_url.clone()),
                                                "{label}"
                                            }
                                            div {
                                                style: "flex: 1; display: flex; flex-direction: column; gap: 2px;",
                                                span {
                                                    style: "
                                                        font-size: 12px; color: {TEXT_PRIMARY};
                                                        white-space: pre-wrap; word-break: break-word;
                                                    ",
                                                    "{text}"
                                                }
                                                if let Some(created) = created {
                                                    span {
                                                        style: "font-size: 10px; color: {TEXT_DIM};",
                                                        "{created}"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                })}
                            }
                        }
                    })}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Note;

    fn note(time: f64, text: &str, created_at: i64) -> Note {
        Note {
            time,
            text: text.to_string(),
            timestamp_text: format_time(time),
            created_at,
        }
    }

    fn fixture() -> HashMap<String, NoteRecord> {
        let mut records = HashMap::new();
        records.insert(
            "vid-a".to_string(),
            NoteRecord {
                title: "Alpha".to_string(),
                notes: vec![note(30.0, "a-late", 100), note(60.0, "a-early", 50)],
            },
        );
        records.insert(
            "vid-b".to_string(),
            NoteRecord {
                title: "Beta".to_string(),
                notes: vec![note(5.0, "b-mid", 75)],
            },
        );
        records
    }

    #[test]
    fn test_flatten_orders_by_created_at_descending() {
        let entries = flatten_notes(&fixture());
        let texts: Vec<&str> = entries.iter().map(|entry| entry.text.as_str()).collect();
        // Creation recency wins regardless of per-video time order
        assert_eq!(texts, vec!["a-late", "b-mid", "a-early"]);
    }

    #[test]
    fn test_flatten_derives_missing_labels_and_titles() {
        let mut records = HashMap::new();
        records.insert(
            "vid".to_string(),
            NoteRecord {
                title: String::new(),
                notes: vec![Note {
                    time: 65.0,
                    text: "x".to_string(),
                    timestamp_text: String::new(),
                    created_at: 0,
                }],
            },
        );
        let entries = flatten_notes(&records);
        assert_eq!(entries[0].timestamp_text, "01:05");
        assert_eq!(entries[0].video_title, "Untitled video");
    }

    #[test]
    fn test_group_order_follows_first_encounter() {
        let entries = flatten_notes(&fixture());
        let groups = group_by_video(&entries);
        // vid-a holds the most recent note, so its group comes first
        assert_eq!(groups[0].video_id, "vid-a");
        assert_eq!(groups[1].video_id, "vid-b");
    }

    #[test]
    fn test_groups_resort_by_time_for_display() {
        let entries = flatten_notes(&fixture());
        let groups = group_by_video(&entries);
        let times: Vec<f64> = groups[0].notes.iter().map(|entry| entry.time).collect();
        assert_eq!(times, vec![30.0, 60.0]);
    }

    #[test]
    fn test_empty_store_flattens_to_nothing() {
        assert!(flatten_notes(&HashMap::new()).is_empty());
        assert!(group_by_video(&[]).is_empty());
    }
}
