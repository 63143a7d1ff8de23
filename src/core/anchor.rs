//! Anchor resolution
//!
//! Decides where the notes panel goes in the watch page. The host layout is
//! third-party and changes without notice, so this is a ranked fallback
//! chain over a `PageSnapshot` rather than a single hardcoded selector:
//!
//! 1. before the metadata/info block, wherever it is
//! 2. after the player element inside the main content region
//! 3. before a metadata block found inside the main region
//! 4. after the first safe direct child of the main region
//! 5. before the secondary/sidebar region (or after its first safe child)
//! 6. before the first safe direct child of the body
//! 7. append to the end of the body
//!
//! "Safe" excludes anything inside a vector graphic subtree; a candidate
//! whose direct parent is a vector container is skipped as a non-content
//! wrapper. The first tier that produces a safe target wins.

use tracing::debug;

use crate::core::dom::PageSnapshot;
use crate::state::SiteProfile;

/// How the panel relates to the resolved target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert the panel immediately before the target
    Before,
    /// Insert the panel immediately after the target
    After,
    /// Append the panel to the end of the body
    Append,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Before => "before",
            Placement::After => "after",
            Placement::Append => "append",
        }
    }
}

/// A resolved insertion point within a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    /// Snapshot index of the target element
    pub target: usize,
    pub placement: Placement,
}

/// Resolve the best insertion point for the panel, or `None` for an empty
/// snapshot.
pub fn resolve_anchor(doc: &PageSnapshot, site: &SiteProfile) -> Option<Insertion> {
    if doc.is_empty() {
        return None;
    }

    // 1. The metadata block is the preferred neighbor: the panel sits
    // between the player and the video info.
    if let Some(metadata) = find_metadata(doc, site) {
        if doc.is_safe(metadata) {
            return Some(Insertion {
                target: metadata,
                placement: Placement::Before,
            });
        }
    }

    // 2-4. Work inside the main content region.
    if let Some(region) = find_region(doc, &site.primary_region_ids) {
        if let Some(player) = find_player(doc, region, site) {
            return Some(Insertion {
                target: player,
                placement: Placement::After,
            });
        }
        if let Some(metadata) = doc.find_within(region, &site.metadata_tags, &site.metadata_ids) {
            if doc.is_safe(metadata) {
                return Some(Insertion {
                    target: metadata,
                    placement: Placement::Before,
                });
            }
        }
        if let Some(child) = doc.first_safe_child(region) {
            return Some(Insertion {
                target: child,
                placement: Placement::After,
            });
        }
    }

    // 5. Sidebar region: sit just above it, or inside it as a last resort.
    if let Some(region) = find_region(doc, &site.sidebar_region_ids) {
        if doc.is_safe(region) {
            return Some(Insertion {
                target: region,
                placement: Placement::Before,
            });
        }
        if let Some(child) = doc.first_safe_child(region) {
            return Some(Insertion {
                target: child,
                placement: Placement::After,
            });
        }
    }

    // 6. Any safe top-level body child.
    if let Some(body) = doc.body() {
        if let Some(child) = doc.first_safe_child(body) {
            return Some(Insertion {
                target: child,
                placement: Placement::Before,
            });
        }
    }

    // 7. Nothing matched at all; the end of the body always exists.
    debug!("anchor resolution fell through to body append");
    let target = doc.body().unwrap_or(0);
    Some(Insertion {
        target,
        placement: Placement::Append,
    })
}

fn find_metadata(doc: &PageSnapshot, site: &SiteProfile) -> Option<usize> {
    site.metadata_tags
        .iter()
        .find_map(|tag| doc.find_by_tag(tag))
        .or_else(|| site.metadata_ids.iter().find_map(|id| doc.find_by_id(id)))
}

/// First safe main/sidebar region candidate, in preference order
fn find_region(doc: &PageSnapshot, ids: &[String]) -> Option<usize> {
    ids.iter()
        .filter_map(|id| doc.find_by_id(id))
        .find(|&region| doc.is_safe(region))
}

/// The player element inside `region`, skipping unsafe candidates and
/// candidates wrapped directly in a vector container.
fn find_player(doc: &PageSnapshot, region: usize, site: &SiteProfile) -> Option<usize> {
    let player = doc.find_within(region, &site.player_tags, &site.player_ids)?;
    if !doc.is_safe(player) {
        return None;
    }
    match doc.parent(player) {
        Some(parent) if PageSnapshot::is_vector_container(&doc.node(parent).tag) => None,
        Some(_) => Some(player),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::test_support::snapshot;

    fn site() -> SiteProfile {
        SiteProfile::default()
    }

    #[test]
    fn test_prefers_metadata_block() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("div#primary-inner", Some(1)),
            ("video", Some(2)),
            ("watch-metadata", Some(2)),
        ]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        assert_eq!(insertion.target, 4);
        assert_eq!(insertion.placement, Placement::Before);
    }

    #[test]
    fn test_metadata_inside_svg_falls_back_to_player() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("svg", Some(1)),
            ("watch-metadata", Some(2)),
            ("div#primary-inner", Some(1)),
            ("div#player", Some(4)),
            ("video", Some(5)),
        ]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        // The id match (#player) comes before the video tag in document order
        assert_eq!(insertion.target, 5);
        assert_eq!(insertion.placement, Placement::After);
    }

    #[test]
    fn test_player_wrapped_in_vector_container_is_skipped() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("div#primary-inner", Some(1)),
            ("svg", Some(2)),
            ("video", Some(3)),
            ("div#sidekick", Some(2)),
        ]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        // No usable player or metadata: first safe child of the region wins
        assert_eq!(insertion.target, 5);
        assert_eq!(insertion.placement, Placement::After);
    }

    #[test]
    fn test_metadata_scoped_to_region_beats_safe_child() {
        // A decoy metadata tag inside an svg comes first in document order;
        // the safe one inside the main region must still win over the plain
        // first-safe-child fallback.
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("svg", Some(1)),
            ("watch-metadata", Some(2)),
            ("div#columns", Some(1)),
            ("div#banner", Some(4)),
            ("watch-metadata", Some(4)),
        ]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        assert_eq!(insertion.target, 6);
        assert_eq!(insertion.placement, Placement::Before);
    }

    #[test]
    fn test_sidebar_fallback() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("div#secondary", Some(1)),
            ("div#related", Some(2)),
        ]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        assert_eq!(insertion.target, 2);
        assert_eq!(insertion.placement, Placement::Before);
    }

    #[test]
    fn test_body_child_fallback() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("svg", Some(1)),
            ("div#app-root", Some(1)),
        ]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        assert_eq!(insertion.target, 3);
        assert_eq!(insertion.placement, Placement::Before);
    }

    #[test]
    fn test_append_when_nothing_is_safe() {
        let doc = snapshot(&[("html", None), ("body", Some(0)), ("svg", Some(1))]);
        let insertion = resolve_anchor(&doc, &site()).unwrap();
        assert_eq!(insertion.target, 1);
        assert_eq!(insertion.placement, Placement::Append);
    }

    #[test]
    fn test_empty_snapshot_resolves_to_nothing() {
        assert!(resolve_anchor(&PageSnapshot::default(), &site()).is_none());
    }
}
