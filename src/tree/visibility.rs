//! Search filtering over the forest.
//!
//! A node is visible when its title contains the query (case-insensitive) or
//! any descendant is visible. Invisible nodes get the hidden style classes;
//! visible folders are expanded so matches show up in a collapsed tree.

use super::{HIDDEN_ADD_CLASS, HIDDEN_CLASS, TreeNode};

/// Mark every node in `forest` visible or hidden against `query`.
///
/// Re-running with the same query on an unchanged forest yields the same
/// flags. A visible node loses any hidden marker left by an earlier query.
pub fn set_visibility(forest: &mut [TreeNode], query: &str) {
    let query = query.to_lowercase();
    crawl_siblings(forest, &query);
}

/// Returns true when at least one sibling is visible.
fn crawl_siblings(nodes: &mut [TreeNode], query: &str) -> bool {
    let mut any_visible = false;
    for (index, node) in nodes.iter_mut().enumerate() {
        node.index = Some(index);
        if crawl_node(node, query) {
            any_visible = true;
            if node.is_folder {
                node.expanded = true;
            }
        }
    }
    any_visible
}

fn crawl_node(node: &mut TreeNode, query: &str) -> bool {
    let matches = node.title.to_lowercase().contains(query);
    let descendant_matches = crawl_siblings(&mut node.children, query);
    let visible = matches || descendant_matches;

    node.visibility = Some(u8::from(visible));
    if visible {
        node.add_class = None;
        if node.cls.as_deref() == Some(HIDDEN_CLASS) {
            node.cls = node.base_class();
        }
    } else {
        node.cls = Some(HIDDEN_CLASS.to_string());
        node.add_class = Some(HIDDEN_ADD_CLASS.to_string());
    }
    visible
}
