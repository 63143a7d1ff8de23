//! Note repository logic
//!
//! The add/delete merge rules over a video's note list. Both surfaces that
//! write notes (overlay and popup) go through these two functions, so the
//! invariants live in exactly one place:
//! - `notes` stays sorted ascending by time (stable; ties keep insertion
//!   order)
//! - a record whose last note was deleted is removed from the store entirely

use tracing::info;

use crate::core::error::{NotesError, NotesResult};
use crate::core::store::NoteStore;
use crate::state::{Note, NoteRecord};

/// Render a playback position as a zero-padded "MM:SS" label.
///
/// Minutes are unbounded rather than wrapped into hours: 125 minutes renders
/// as "125:09".
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Merge a new note into a video's record, creating the record on first use.
///
/// Rejects empty or whitespace-only text before touching the store. Also
/// refreshes the stored title to the latest-known value. Returns the record
/// as written.
pub async fn add_note(
    store: &NoteStore,
    video_id: &str,
    title: &str,
    time: f64,
    text: &str,
) -> NotesResult<NoteRecord> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotesError::EmptyText);
    }

    let mut record = store
        .get(video_id)
        .await?
        .unwrap_or_else(|| NoteRecord::new(title));

    record.notes.push(Note {
        time,
        text: text.to_string(),
        timestamp_text: format_time(time),
        created_at: now_ms(),
    });
    // Stable sort: equal times keep their insertion order
    record.notes.sort_by(|a, b| a.time.total_cmp(&b.time));
    record.title = title.to_string();

    store.set(video_id, record.clone()).await?;
    info!(video_id, time, "note added");
    Ok(record)
}

/// Remove the note at `index` from a video's record.
///
/// Fails with `NotFound` when the record or the index is absent, without
/// writing anything. Deleting the last note removes the record's key from
/// the store; the shrunk record is returned otherwise.
pub async fn delete_note(
    store: &NoteStore,
    video_id: &str,
    index: usize,
) -> NotesResult<Option<NoteRecord>> {
    let Some(mut record) = store.get(video_id).await? else {
        return Err(NotesError::NotFound);
    };
    if index >= record.notes.len() {
        return Err(NotesError::NotFound);
    }

    record.notes.remove(index);

    if record.notes.is_empty() {
        store.remove(video_id).await?;
        info!(video_id, "last note deleted, record removed");
        Ok(None)
    } else {
        store.set(video_id, record.clone()).await?;
        info!(video_id, index, "note deleted");
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(65.9), "01:05");
        // No hour rollover: minutes render unbounded
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(7509.0), "125:09");
    }

    #[tokio::test]
    async fn test_add_keeps_notes_sorted() {
        let store = NoteStore::in_memory();
        add_note(&store, "abc", "T", 42.0, "intro").await.unwrap();
        add_note(&store, "abc", "T", 10.0, "start").await.unwrap();
        add_note(&store, "abc", "T", 30.0, "middle").await.unwrap();

        let record = store.get("abc").await.unwrap().unwrap();
        let times: Vec<f64> = record.notes.iter().map(|n| n.time).collect();
        assert_eq!(times, vec![10.0, 30.0, 42.0]);
    }

    #[tokio::test]
    async fn test_add_is_stable_on_equal_times() {
        let store = NoteStore::in_memory();
        add_note(&store, "abc", "T", 5.0, "first").await.unwrap();
        add_note(&store, "abc", "T", 5.0, "second").await.unwrap();
        add_note(&store, "abc", "T", 5.0, "third").await.unwrap();

        let record = store.get("abc").await.unwrap().unwrap();
        let texts: Vec<&str> = record.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_add_refreshes_title_and_derives_label() {
        let store = NoteStore::in_memory();
        add_note(&store, "abc", "Old Title", 42.0, "intro")
            .await
            .unwrap();
        add_note(&store, "abc", "New Title", 10.0, "start")
            .await
            .unwrap();

        let record = store.get("abc").await.unwrap().unwrap();
        assert_eq!(record.title, "New Title");
        assert_eq!(record.notes[1].timestamp_text, "00:42");
        assert!(record.notes[0].created_at > 0);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_text_without_writing() {
        let store = NoteStore::in_memory();
        let err = add_note(&store, "abc", "T", 1.0, "   ").await.unwrap_err();
        assert!(matches!(err, NotesError::EmptyText));
        assert!(store.get("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_out_of_range_is_not_found_and_writes_nothing() {
        let store = NoteStore::in_memory();
        add_note(&store, "abc", "T", 1.0, "only").await.unwrap();
        let rx = store.subscribe();
        let version_before = *rx.borrow();

        let err = delete_note(&store, "abc", 5).await.unwrap_err();
        assert!(matches!(err, NotesError::NotFound));
        let err = delete_note(&store, "missing", 0).await.unwrap_err();
        assert!(matches!(err, NotesError::NotFound));

        assert_eq!(*rx.borrow(), version_before);
        assert_eq!(store.get("abc").await.unwrap().unwrap().notes.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_keeps_remaining_order() {
        let store = NoteStore::in_memory();
        add_note(&store, "abc", "T", 10.0, "a").await.unwrap();
        add_note(&store, "abc", "T", 20.0, "b").await.unwrap();
        add_note(&store, "abc", "T", 30.0, "c").await.unwrap();

        let record = delete_note(&store, "abc", 1).await.unwrap().unwrap();
        let texts: Vec<&str> = record.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_full_add_delete_lifecycle() {
        let store = NoteStore::in_memory();

        add_note(&store, "abc", "T", 42.0, "intro").await.unwrap();
        let record = store.get("abc").await.unwrap().unwrap();
        assert_eq!(record.title, "T");
        assert_eq!(record.notes[0].time, 42.0);
        assert_eq!(record.notes[0].text, "intro");
        assert_eq!(record.notes[0].timestamp_text, "00:42");

        add_note(&store, "abc", "T", 10.0, "start").await.unwrap();
        let record = store.get("abc").await.unwrap().unwrap();
        assert_eq!(record.notes[0].text, "start");
        assert_eq!(record.notes[1].text, "intro");

        let remaining = delete_note(&store, "abc", 0).await.unwrap().unwrap();
        assert_eq!(remaining.notes.len(), 1);
        assert_eq!(remaining.notes[0].time, 42.0);

        // Deleting the only remaining note removes the key entirely
        assert!(delete_note(&store, "abc", 0).await.unwrap().is_none());
        assert!(store.get("abc").await.unwrap().is_none());
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
