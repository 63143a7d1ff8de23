//! Application settings
//!
//! Persisted as JSON next to the note store. The `SiteProfile` half is the
//! contract this app assumes about the watch page it decorates: URL shape,
//! title suffix, and the selector names the anchor resolver probes. Keeping
//! it in settings means a layout change degrades into a config edit instead
//! of a code change.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Top-level application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Path of the JSON note store
    pub store_path: PathBuf,
    /// Directory scanned for watchable media files
    pub media_dir: PathBuf,
    /// Host-page contract consumed by the overlay injector
    pub site: SiteProfile,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("watchnotes.notes.json"),
            media_dir: PathBuf::from("media"),
            site: SiteProfile::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from a file, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to a file
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// The watch-page contract: everything the injector assumes about the host
/// page, gathered in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Path marker identifying a watch page URL
    pub watch_marker: String,
    /// Base used when constructing outbound watch URLs
    pub watch_base: String,
    /// Suffix the page appends to the document title, stripped for display
    pub title_suffix: String,
    /// Tag names of the metadata/info block (preferred anchor)
    pub metadata_tags: Vec<String>,
    /// Element ids of the metadata/info block
    pub metadata_ids: Vec<String>,
    /// Element ids of the player element or its wrapper
    pub player_ids: Vec<String>,
    /// Tag names of the player element
    pub player_tags: Vec<String>,
    /// Element ids of the main content region, in preference order
    pub primary_region_ids: Vec<String>,
    /// Element ids of the secondary/sidebar region
    pub sidebar_region_ids: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            watch_marker: "/watch".to_string(),
            watch_base: "/watch".to_string(),
            title_suffix: " - WatchNotes".to_string(),
            metadata_tags: vec!["watch-metadata".to_string()],
            metadata_ids: vec!["watch-metadata".to_string()],
            player_ids: vec!["player".to_string(), "movie-player".to_string()],
            player_tags: vec!["video".to_string()],
            primary_region_ids: vec![
                "primary-inner".to_string(),
                "columns".to_string(),
                "primary".to_string(),
            ],
            sidebar_region_ids: vec!["secondary".to_string(), "related".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let settings = AppSettings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = AppSettings::load_or_default(Path::new("no-such-settings.json"));
        assert_eq!(settings, AppSettings::default());
    }
}
