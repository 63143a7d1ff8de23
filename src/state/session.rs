//! Watch-surface session state
//!
//! Instance-held state for the currently displayed watch page. One value per
//! page load, owned by the watch surface; never process-wide globals.

/// The watch surface's view of the current page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchSession {
    /// Video id parsed from the current watch URL, if any
    pub video_id: Option<String>,
    /// Full document title as the page shows it (site suffix included)
    pub page_title: String,
    /// Resolved media source URL for the player element
    pub media_src: Option<String>,
    /// Start offset requested by the URL's `t` parameter, consumed after the
    /// first successful render
    pub pending_start: Option<f64>,
}

impl WatchSession {
    /// Reset to the no-video state
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a video is currently presented
    #[allow(dead_code)]
    pub fn has_video(&self) -> bool {
        self.video_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_everything() {
        let mut session = WatchSession {
            video_id: Some("abc".to_string()),
            page_title: "T - WatchNotes".to_string(),
            media_src: Some("http://watchnotes.localhost/media/abc.mp4".to_string()),
            pending_start: Some(42.0),
        };
        session.clear();
        assert!(!session.has_video());
        assert_eq!(session, WatchSession::default());
    }
}
