//! Navigation watch
//!
//! The watch page behaves like a single-page app: the DOM mutates and the
//! URL changes without a document reload. Four independent signal sources
//! (bulk DOM mutations, back/forward, internal history navigation, and a
//! periodic poll) all funnel into one `NavigationWatcher`, which owns the
//! last-rendered video id and emits a `VideoChanged` event only when the
//! identity actually differs. One dispatcher drives re-render; the sources
//! stay dumb.

use crate::state::SiteProfile;
use crate::utils;

/// Where a navigation observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
    /// A bulk DOM mutation was observed on the document
    DomMutated,
    /// Back/forward navigation restored an earlier history entry
    HistoryPopped,
    /// The page's own navigation pushed or replaced a history entry
    HistoryChanged,
    /// Periodic fallback poll
    PollTick,
}

/// An observation carried from a signal source to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct NavEvent {
    pub signal: NavigationSignal,
    pub url: String,
}

/// Emitted when the watch surface must re-resolve and re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoChanged {
    pub video_id: String,
}

/// Instance-held navigation state for one watch surface.
#[derive(Debug, Default)]
pub struct NavigationWatcher {
    rendered_video_id: Option<String>,
}

impl NavigationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one observation through the dispatcher. Returns an event when
    /// the URL resolves to a watch page whose video id differs from the last
    /// one rendered, regardless of which source noticed it first.
    pub fn observe(
        &mut self,
        _signal: NavigationSignal,
        url: &str,
        site: &SiteProfile,
    ) -> Option<VideoChanged> {
        if !utils::is_watch_url(url, &site.watch_marker) {
            return None;
        }
        let video_id = utils::parse_video_id(url)?;
        if self.rendered_video_id.as_deref() == Some(video_id.as_str()) {
            return None;
        }
        Some(VideoChanged { video_id })
    }

    /// Record that the surface finished rendering for `video_id`; later
    /// observations of the same id are suppressed.
    pub fn mark_rendered(&mut self, video_id: &str) {
        self.rendered_video_id = Some(video_id.to_string());
    }

    /// Forget the rendered id, forcing the next observation to re-render.
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.rendered_video_id = None;
    }

    #[allow(dead_code)]
    pub fn rendered_video_id(&self) -> Option<&str> {
        self.rendered_video_id.as_deref()
    }
}

/// Bounded retry budget for the initial render, re-armed per navigation.
/// Tolerates the player not being mounted yet when the page is still
/// assembling itself.
#[derive(Debug)]
pub struct RenderRetry {
    attempts: u32,
    max_attempts: u32,
}

impl RenderRetry {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
        }
    }

    /// Consume one attempt; `false` once the budget is exhausted.
    pub fn next_attempt(&mut self) -> bool {
        if self.attempts >= self.max_attempts {
            return false;
        }
        self.attempts += 1;
        true
    }

    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    #[allow(dead_code)]
    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteProfile {
        SiteProfile::default()
    }

    #[test]
    fn test_every_source_triggers_on_identity_change() {
        let signals = [
            NavigationSignal::DomMutated,
            NavigationSignal::HistoryPopped,
            NavigationSignal::HistoryChanged,
            NavigationSignal::PollTick,
        ];
        for signal in signals {
            let mut watcher = NavigationWatcher::new();
            watcher.mark_rendered("old");
            let change = watcher.observe(signal, "/watch?v=new", &site());
            assert_eq!(
                change,
                Some(VideoChanged {
                    video_id: "new".to_string()
                })
            );
        }
    }

    #[test]
    fn test_same_video_is_suppressed() {
        let mut watcher = NavigationWatcher::new();
        let change = watcher.observe(NavigationSignal::PollTick, "/watch?v=abc", &site());
        assert!(change.is_some());
        watcher.mark_rendered("abc");

        for signal in [
            NavigationSignal::DomMutated,
            NavigationSignal::HistoryPopped,
            NavigationSignal::PollTick,
        ] {
            assert!(watcher.observe(signal, "/watch?v=abc", &site()).is_none());
        }
    }

    #[test]
    fn test_non_watch_urls_are_ignored() {
        let mut watcher = NavigationWatcher::new();
        assert!(watcher
            .observe(NavigationSignal::HistoryChanged, "/library", &site())
            .is_none());
        assert!(watcher
            .observe(NavigationSignal::PollTick, "/watch", &site())
            .is_none());
    }

    #[test]
    fn test_reset_forces_re_render() {
        let mut watcher = NavigationWatcher::new();
        watcher.mark_rendered("abc");
        assert!(watcher
            .observe(NavigationSignal::PollTick, "/watch?v=abc", &site())
            .is_none());

        watcher.reset();
        assert!(watcher
            .observe(NavigationSignal::PollTick, "/watch?v=abc", &site())
            .is_some());
    }

    #[test]
    fn test_retry_budget_exhausts() {
        let mut retry = RenderRetry::new(3);
        assert!(retry.next_attempt());
        assert!(retry.next_attempt());
        assert!(retry.next_attempt());
        assert!(!retry.next_attempt());
        assert!(retry.exhausted());

        retry.reset();
        assert!(retry.next_attempt());
    }
}
