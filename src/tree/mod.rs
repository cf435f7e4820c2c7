//! The index tree.
//!
//! One [`TreeNode`] type is used for every level:
//!
//! ```text
//! 1  type          CustomObject
//! 2  item/folder   CustomObject.Account
//! 3  child tag     CustomObject.Account.fields
//! 4  child leaf    CustomObject.Account.fields.Region__c
//! ```
//!
//! Folder-scoped types stop at level 3 (`Document.Shared.logo`).
//! Level-specific fields are `None`/default outside the levels that set them.
//! A forest is the ordered list of level-1 nodes produced by one run.

pub mod selection;
pub mod visibility;

pub use selection::{apply_third_state, ensure_parents_checked, set_checked};
pub use visibility::set_visibility;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::TypeDescriptor;

/// Style class of expandable nodes.
pub const FOLDER_CLASS: &str = "folder";
/// Style class of nodes filtered out by a search.
pub const HIDDEN_CLASS: &str = "hidden";
/// Extra class a tree widget uses to hide filtered nodes.
pub const HIDDEN_ADD_CLASS: &str = "dynatree-hidden";
/// Style class of partially selected nodes.
pub const PARTIAL_CLASS: &str = "x-tree-checkbox-checked-disabled";

/// Ordered collection of level-1 nodes.
pub type Forest = Vec<TreeNode>;

/// Tri-state selection derived from descendants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionState {
    #[default]
    Unchecked,
    PartiallyChecked,
    FullyChecked,
}

/// Type information carried by level-1 nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub xml_name: String,
    pub directory_name: String,
    pub has_child_types: bool,
    pub in_folder: bool,
}

impl From<&TypeDescriptor> for TypeInfo {
    fn from(descriptor: &TypeDescriptor) -> Self {
        Self {
            xml_name: descriptor.xml_name.clone(),
            directory_name: descriptor.directory_name.clone(),
            has_child_types: descriptor.has_child_types(),
            in_folder: descriptor.in_folder,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Dotted path, e.g. `CustomObject.Account.fields.Region__c`
    pub id: String,
    pub level: u8,
    pub text: String,
    pub title: String,
    pub is_folder: bool,
    pub leaf: bool,
    #[serde(default)]
    pub children: Vec<TreeNode>,

    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub select: bool,
    #[serde(default)]
    pub selection: SelectionState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_class: Option<String>,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u8>,
    /// Position among siblings, recorded by the search walk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// Remote full name of level-2 items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Level 1 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_info: Option<TypeInfo>,
}

impl TreeNode {
    fn labelled(id: String, level: u8, label: &str) -> Self {
        Self {
            id,
            level,
            text: label.to_string(),
            title: label.to_string(),
            ..Default::default()
        }
    }

    /// Level-1 node for a metadata type.
    pub fn for_type(descriptor: &TypeDescriptor) -> Self {
        let name = &descriptor.xml_name;
        Self {
            is_folder: true,
            cls: Some(FOLDER_CLASS.to_string()),
            type_info: Some(TypeInfo::from(descriptor)),
            ..Self::labelled(name.clone(), 1, name)
        }
    }

    /// Level-2 node for a listed item. Expandable items start with no children.
    pub fn for_item(type_name: &str, full_name: &str, expandable: bool) -> Self {
        Self {
            is_folder: expandable,
            leaf: !expandable,
            cls: expandable.then(|| FOLDER_CLASS.to_string()),
            full_name: Some(full_name.to_string()),
            ..Self::labelled(join_id(&[type_name, full_name]), 2, full_name)
        }
    }

    /// Expandable node below an existing parent.
    pub fn branch(parent_id: &str, level: u8, label: &str, children: Vec<TreeNode>) -> Self {
        Self {
            is_folder: true,
            cls: Some(FOLDER_CLASS.to_string()),
            children,
            ..Self::labelled(join_id(&[parent_id, label]), level, label)
        }
    }

    /// Terminal node below an existing parent.
    pub fn leaf(parent_id: &str, level: u8, label: &str) -> Self {
        Self {
            leaf: true,
            ..Self::labelled(join_id(&[parent_id, label]), level, label)
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, text: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.text == text)
    }

    pub fn child_mut(&mut self, text: &str) -> Option<&mut TreeNode> {
        self.children.iter_mut().find(|c| c.text == text)
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Some(0)
    }

    /// Style class the node has when it is not hidden.
    pub(crate) fn base_class(&self) -> Option<String> {
        if self.selection == SelectionState::PartiallyChecked {
            Some(PARTIAL_CLASS.to_string())
        } else if self.is_folder {
            Some(FOLDER_CLASS.to_string())
        } else {
            None
        }
    }

    /// Depth-first iterator over this node and its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &TreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Join id segments with `.`.
pub fn join_id(parts: &[&str]) -> String {
    parts.join(".")
}

/// Find a node anywhere in the forest by id.
pub fn find_node<'a>(forest: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    forest
        .iter()
        .flat_map(TreeNode::descendants)
        .find(|node| node.id == id)
}

/// Mutable lookup by id. Descends only into subtrees whose id prefixes `id`.
pub fn find_node_mut<'a>(forest: &'a mut [TreeNode], id: &str) -> Option<&'a mut TreeNode> {
    for node in forest.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        let prefix = format!("{}.", node.id);
        if id.starts_with(&prefix) {
            if let Some(found) = find_node_mut(&mut node.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Apply a selection and an optional search to a freshly indexed forest.
///
/// Runs checked propagation, parent completion and tri-state computation,
/// then filters by `query` when it is non-empty.
pub fn prepare_view(forest: &mut [TreeNode], selected: &HashSet<String>, query: Option<&str>) {
    set_checked(forest, selected);
    ensure_parents_checked(forest);
    apply_third_state(forest);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        set_visibility(forest, query);
    }
}
