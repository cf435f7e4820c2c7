//! Selection propagation between a flat id set and the tree.
//!
//! Traversal only follows `children`; no other field is walked.

use std::collections::HashSet;

use super::{PARTIAL_CLASS, SelectionState, TreeNode};

/// Check every node whose id is in `ids`, together with its descendants.
pub fn set_checked(forest: &mut [TreeNode], ids: &HashSet<String>) {
    for node in forest {
        if ids.contains(&node.id) {
            check_subtree(node);
        } else {
            set_checked(&mut node.children, ids);
        }
    }
}

fn check_subtree(node: &mut TreeNode) {
    node.checked = true;
    node.select = true;
    for child in &mut node.children {
        check_subtree(child);
    }
}

/// Check a parent when every one of its children is selected.
///
/// Parents are evaluated before their children, so completion climbs a
/// single level per call.
pub fn ensure_parents_checked(forest: &mut [TreeNode]) {
    for node in forest {
        if node.has_children() && node.children.iter().all(|c| c.select) {
            node.checked = true;
            node.select = true;
        }
        ensure_parents_checked(&mut node.children);
    }
}

/// Compute tri-state selection bottom-up.
///
/// A node whose children are all checked becomes checked. A node with some
/// but not all children checked becomes partial and carries the partial
/// style class; its `checked` flag is left alone.
pub fn apply_third_state(forest: &mut [TreeNode]) {
    for node in forest {
        apply_third_state(&mut node.children);

        node.selection = third_state(node);
        match node.selection {
            SelectionState::FullyChecked => {
                node.checked = true;
                if node.cls.as_deref() == Some(PARTIAL_CLASS) {
                    node.cls = node.base_class();
                }
            }
            // A search-hidden node keeps its hidden class; unhiding restores
            // the partial class from `selection`.
            SelectionState::PartiallyChecked if node.is_hidden() => {}
            SelectionState::PartiallyChecked => node.cls = Some(PARTIAL_CLASS.to_string()),
            SelectionState::Unchecked => {
                if node.cls.as_deref() == Some(PARTIAL_CLASS) {
                    node.cls = node.base_class();
                }
            }
        }
    }
}

fn third_state(node: &TreeNode) -> SelectionState {
    if !node.has_children() {
        return if node.checked {
            SelectionState::FullyChecked
        } else {
            SelectionState::Unchecked
        };
    }

    let total = node.children.len();
    let checked = node.children.iter().filter(|c| c.checked).count();
    if checked == total {
        SelectionState::FullyChecked
    } else if checked > 0 {
        SelectionState::PartiallyChecked
    } else {
        SelectionState::Unchecked
    }
}

/// Ids of every checked node, in depth-first order.
pub fn checked_ids(forest: &[TreeNode]) -> Vec<String> {
    forest
        .iter()
        .flat_map(TreeNode::descendants)
        .filter(|node| node.checked)
        .map(|node| node.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::sample_forest;
    use crate::tree::{FOLDER_CLASS, HIDDEN_ADD_CLASS, HIDDEN_CLASS, find_node, set_visibility};

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_set_checked_marks_matching_nodes() {
        let mut forest = sample_forest();
        set_checked(&mut forest, &ids(&["ApexClass.Billing", "CustomObject.Lead.fields.Tier__c"]));

        let billing = find_node(&forest, "ApexClass.Billing").unwrap();
        assert!(billing.checked && billing.select);
        assert!(find_node(&forest, "CustomObject.Lead.fields.Tier__c").unwrap().checked);
        assert!(!find_node(&forest, "ApexClass.Util").unwrap().checked);
        assert!(!find_node(&forest, "ApexClass").unwrap().checked);
    }

    #[test]
    fn test_set_checked_cascades_to_descendants() {
        let mut forest = sample_forest();
        set_checked(&mut forest, &ids(&["CustomObject.Lead"]));

        assert_eq!(
            checked_ids(&forest),
            vec![
                "CustomObject.Lead",
                "CustomObject.Lead.fields",
                "CustomObject.Lead.fields.Region__c",
                "CustomObject.Lead.fields.Tier__c",
            ]
        );
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut forest = sample_forest();
        set_checked(&mut forest, &ids(&["ApexClass.Missing"]));
        assert!(checked_ids(&forest).is_empty());
    }

    #[test]
    fn test_ensure_parents_single_level() {
        let mut forest = sample_forest();
        set_checked(
            &mut forest,
            &ids(&["CustomObject.Lead.fields.Region__c", "CustomObject.Lead.fields.Tier__c"]),
        );

        ensure_parents_checked(&mut forest);
        assert!(find_node(&forest, "CustomObject.Lead.fields").unwrap().select);
        // Grandparent is not completed in the same pass
        assert!(!find_node(&forest, "CustomObject.Lead").unwrap().select);

        ensure_parents_checked(&mut forest);
        assert!(find_node(&forest, "CustomObject.Lead").unwrap().select);
    }

    #[test]
    fn test_ensure_parents_ignores_leaves() {
        let mut forest = sample_forest();
        ensure_parents_checked(&mut forest);
        assert!(checked_ids(&forest).is_empty());
    }

    #[test]
    fn test_third_state_all_children_checked() {
        let mut forest = sample_forest();
        set_checked(
            &mut forest,
            &ids(&["ApexClass.AccountService", "ApexClass.Billing", "ApexClass.Util"]),
        );

        apply_third_state(&mut forest);
        let apex = find_node(&forest, "ApexClass").unwrap();
        assert!(apex.checked);
        assert_eq!(apex.selection, SelectionState::FullyChecked);
        assert_eq!(apex.cls.as_deref(), Some(FOLDER_CLASS));
    }

    #[test]
    fn test_third_state_partial() {
        let mut forest = sample_forest();
        set_checked(&mut forest, &ids(&["ApexClass.Billing"]));

        apply_third_state(&mut forest);
        let apex = find_node(&forest, "ApexClass").unwrap();
        assert!(!apex.checked);
        assert_eq!(apex.selection, SelectionState::PartiallyChecked);
        assert_eq!(apex.cls.as_deref(), Some(PARTIAL_CLASS));

        let object = find_node(&forest, "CustomObject").unwrap();
        assert_eq!(object.selection, SelectionState::Unchecked);
        assert_eq!(object.cls.as_deref(), Some(FOLDER_CLASS));
    }

    #[test]
    fn test_third_state_after_search_keeps_hidden_class() {
        let mut forest = sample_forest();
        set_visibility(&mut forest, "zzz");
        set_checked(&mut forest, &ids(&["ApexClass.Billing"]));

        apply_third_state(&mut forest);
        let apex = find_node(&forest, "ApexClass").unwrap();
        assert_eq!(apex.selection, SelectionState::PartiallyChecked);
        assert_eq!(apex.cls.as_deref(), Some(HIDDEN_CLASS));
        assert_eq!(apex.add_class.as_deref(), Some(HIDDEN_ADD_CLASS));

        // Revealing the node brings the partial class back
        set_visibility(&mut forest, "apex");
        let apex = find_node(&forest, "ApexClass").unwrap();
        assert!(!apex.is_hidden());
        assert_eq!(apex.cls.as_deref(), Some(PARTIAL_CLASS));
    }

    #[test]
    fn test_third_state_propagates_from_leaves() {
        let mut forest = sample_forest();
        set_checked(
            &mut forest,
            &ids(&["CustomObject.Lead.fields.Region__c", "CustomObject.Lead.fields.Tier__c"]),
        );

        apply_third_state(&mut forest);
        for id in ["CustomObject.Lead.fields", "CustomObject.Lead", "CustomObject"] {
            let node = find_node(&forest, id).unwrap();
            assert!(node.checked, "{id} should be checked");
        }
    }

    #[test]
    fn test_partial_marker_cleared_when_complete() {
        let mut forest = sample_forest();
        set_checked(&mut forest, &ids(&["ApexClass.Billing"]));
        apply_third_state(&mut forest);

        set_checked(&mut forest, &ids(&["ApexClass"]));
        apply_third_state(&mut forest);
        let apex = find_node(&forest, "ApexClass").unwrap();
        assert_eq!(apex.selection, SelectionState::FullyChecked);
        assert_eq!(apex.cls.as_deref(), Some(FOLDER_CLASS));
    }
}
