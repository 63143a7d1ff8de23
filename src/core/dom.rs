//! Page snapshot
//!
//! The watch page's DOM is an external structure this app does not control.
//! Instead of querying it live, the injector script walks the document in
//! document order and sends back a flat skeleton (tag, id, parent per
//! element); `PageSnapshot` rebuilds that into a queryable tree so anchor
//! resolution can run, and be tested, entirely in Rust.

use serde::Deserialize;

/// One element of a harvested skeleton, in document order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageNode {
    /// Lowercased tag name
    pub tag: String,
    /// The element's id attribute, when non-empty
    #[serde(default)]
    pub id: Option<String>,
    /// Index of the parent element within the snapshot; `None` for the root
    #[serde(default)]
    pub parent: Option<usize>,
}

/// A skeleton of the live document at one point in time.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    nodes: Vec<PageNode>,
    children: Vec<Vec<usize>>,
    body: Option<usize>,
}

impl PageSnapshot {
    /// Rebuild the tree from a flat, document-ordered node list.
    ///
    /// The harvest script emits parents before children; a forward or
    /// dangling parent reference is treated as "no parent" so one malformed
    /// entry cannot skew the rest of the tree.
    pub fn from_nodes(mut nodes: Vec<PageNode>) -> Self {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for index in 0..nodes.len() {
            match nodes[index].parent {
                Some(parent) if parent < index => children[parent].push(index),
                Some(_) => nodes[index].parent = None,
                None => {}
            }
        }
        let body = nodes.iter().position(|node| node.tag == "body");
        Self {
            nodes,
            children,
            body,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &PageNode {
        &self.nodes[index]
    }

    pub fn body(&self) -> Option<usize> {
        self.body
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes[index].parent
    }

    /// Direct children, in document order
    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// First element with the given id, in document order
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
    }

    /// First element with the given tag, in document order
    pub fn find_by_tag(&self, tag: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.tag == tag)
    }

    /// Whether the given tag carries a video element
    pub fn has_tag(&self, tag: &str) -> bool {
        self.find_by_tag(tag).is_some()
    }

    /// First descendant of `root` matching any of the tags or ids, scanning
    /// in document order (the snapshot is document-ordered, so an index scan
    /// visits candidates the way a live selector query would).
    pub fn find_within(&self, root: usize, tags: &[String], ids: &[String]) -> Option<usize> {
        (root + 1..self.nodes.len()).find(|&index| {
            let node = &self.nodes[index];
            let matches = tags.iter().any(|tag| node.tag == *tag)
                || node
                    .id
                    .as_deref()
                    .map(|id| ids.iter().any(|want| want == id))
                    .unwrap_or(false);
            matches && self.is_descendant_of(index, root)
        })
    }

    pub fn is_descendant_of(&self, index: usize, root: usize) -> bool {
        let mut current = self.parent(index);
        while let Some(ancestor) = current {
            if ancestor == root {
                return true;
            }
            current = self.parent(ancestor);
        }
        false
    }

    /// True for elements that must never host or anchor the panel: vector
    /// graphic containers and their definitions subtree.
    pub fn is_vector_container(tag: &str) -> bool {
        tag.eq_ignore_ascii_case("svg") || tag.eq_ignore_ascii_case("defs")
    }

    /// An element is safe when the walk from it up to the body (or root)
    /// never passes through a vector graphic container, itself included.
    pub fn is_safe(&self, index: usize) -> bool {
        let mut current = Some(index);
        while let Some(node) = current {
            if Self::is_vector_container(&self.nodes[node].tag) {
                return false;
            }
            if Some(node) == self.body {
                return true;
            }
            current = self.parent(node);
        }
        true
    }

    /// First direct child of `region` that is safe to anchor against
    pub fn first_safe_child(&self, region: usize) -> Option<usize> {
        self.children(region)
            .iter()
            .copied()
            .find(|&child| self.is_safe(child))
    }

    /// Child-index path from the root down to `index`, used by the mount
    /// script to re-locate the element in the live document.
    pub fn path(&self, index: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            let position = self.children(parent)
                .iter()
                .position(|&child| child == current)
                .unwrap_or(0);
            path.push(position);
            current = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Compact builder for snapshot fixtures: ("tag#id" | "tag", parent).
    pub fn snapshot(layout: &[(&str, Option<usize>)]) -> PageSnapshot {
        let nodes = layout
            .iter()
            .map(|(desc, parent)| {
                let (tag, id) = match desc.split_once('#') {
                    Some((tag, id)) => (tag.to_string(), Some(id.to_string())),
                    None => (desc.to_string(), None),
                };
                PageNode {
                    tag,
                    id,
                    parent: *parent,
                }
            })
            .collect();
        PageSnapshot::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::snapshot;
    use super::*;

    #[test]
    fn test_lookup_in_document_order() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("div#first", Some(1)),
            ("div#second", Some(1)),
            ("span", Some(2)),
        ]);
        assert_eq!(doc.find_by_id("second"), Some(3));
        assert_eq!(doc.find_by_tag("span"), Some(4));
        assert_eq!(doc.body(), Some(1));
        assert_eq!(doc.children(1), &[2, 3]);
    }

    #[test]
    fn test_safety_walk_rejects_vector_subtrees() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("svg", Some(1)),
            ("defs", Some(2)),
            ("div#inside-svg", Some(3)),
            ("div#plain", Some(1)),
        ]);
        assert!(!doc.is_safe(2));
        assert!(!doc.is_safe(4));
        assert!(doc.is_safe(5));
        assert_eq!(doc.first_safe_child(1), Some(5));
    }

    #[test]
    fn test_find_within_scopes_to_descendants() {
        let doc = snapshot(&[
            ("html", None),
            ("body", Some(0)),
            ("div#outside", Some(1)),
            ("video", Some(2)),
            ("div#region", Some(1)),
            ("div#wrapper", Some(4)),
            ("video", Some(5)),
        ]);
        let region = doc.find_by_id("region").unwrap();
        let found = doc.find_within(region, &["video".to_string()], &[]);
        assert_eq!(found, Some(6));
    }

    #[test]
    fn test_path_addresses_by_child_indices() {
        let doc = snapshot(&[
            ("html", None),
            ("head", Some(0)),
            ("body", Some(0)),
            ("div#a", Some(2)),
            ("div#b", Some(2)),
            ("p", Some(4)),
        ]);
        // html -> body is child 1, body -> div#b is child 1, div#b -> p is child 0
        assert_eq!(doc.path(5), vec![1, 1, 0]);
        assert_eq!(doc.path(0), Vec::<usize>::new());
    }

    #[test]
    fn test_malformed_parent_references_are_dropped() {
        let doc = PageSnapshot::from_nodes(vec![
            PageNode {
                tag: "html".to_string(),
                id: None,
                parent: None,
            },
            PageNode {
                tag: "div".to_string(),
                id: None,
                parent: Some(7),
            },
        ]);
        assert_eq!(doc.children(0).len(), 0);
    }
}
