//! Note data model
//!
//! The wire format of the local note store: one `NoteRecord` per video,
//! keyed by the video id extracted from the watch URL.

use serde::{Deserialize, Serialize};

/// A single timestamped annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Playback position in seconds
    pub time: f64,
    /// Note body
    pub text: String,
    /// Pre-rendered MM:SS label, stored redundantly for display.
    /// Older records may lack it; display derives it from `time` instead.
    #[serde(default)]
    pub timestamp_text: String,
    /// Creation stamp in epoch milliseconds
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

/// Per-video container of title + time-ordered notes.
///
/// Invariants maintained by the repository layer:
/// - `notes` is sorted ascending by `time` after every insertion
/// - a record with no notes is removed from the store instead of kept empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Latest-known display title of the video
    pub title: String,
    /// Ordered notes. Missing in some legacy records, hence the default.
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl NoteRecord {
    /// Create an empty record carrying the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerates_missing_fields() {
        // Legacy records may lack notes, timestamp_text, and createdAt
        let record: NoteRecord = serde_json::from_str(r#"{"title": "Old"}"#).unwrap();
        assert_eq!(record.title, "Old");
        assert!(record.notes.is_empty());

        let record: NoteRecord =
            serde_json::from_str(r#"{"title": "Old", "notes": [{"time": 4.0, "text": "hi"}]}"#)
                .unwrap();
        assert_eq!(record.notes.len(), 1);
        assert_eq!(record.notes[0].timestamp_text, "");
        assert_eq!(record.notes[0].created_at, 0);
    }

    #[test]
    fn test_wire_field_names() {
        let note = Note {
            time: 42.0,
            text: "intro".to_string(),
            timestamp_text: "00:42".to_string(),
            created_at: 1700000000000,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["createdAt"], 1700000000000_i64);
        assert_eq!(json["timestamp_text"], "00:42");
    }

    #[test]
    fn test_record_round_trip() {
        let record = NoteRecord {
            title: "T".to_string(),
            notes: vec![Note {
                time: 10.0,
                text: "start".to_string(),
                timestamp_text: "00:10".to_string(),
                created_at: 1,
            }],
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: NoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
