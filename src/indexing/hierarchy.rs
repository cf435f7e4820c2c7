//! Two-level hierarchy for one listing result.

use tracing::{trace, warn};

use crate::catalog::{TypeCatalog, TypeDescriptor, base_type_name};
use crate::client::{ItemStub, ListResult};
use crate::error::IndexResult;
use crate::naming::item_name_from_path;
use crate::tree::TreeNode;

/// Deeper materialization a type needs after the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Items are leaves, the level-1 node is complete.
    Final,
    /// Retrieve these members and parse their child declarations.
    Children { members: Vec<String> },
    /// List the contents of every level-2 folder.
    Folders,
}

/// A level-1 node with its level-2 items, plus what to do next.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    pub descriptor: TypeDescriptor,
    pub node: TreeNode,
    pub expansion: Expansion,
}

/// Build the level-1 node and sorted level-2 items for a listing.
///
/// `requested` is the descriptor the listing was issued for. It is used as
/// is when the listing key normalizes to the same type, and as the fallback
/// when the listing came back empty.
pub fn build_hierarchy(
    catalog: &TypeCatalog,
    requested: &TypeDescriptor,
    listing: ListResult,
) -> IndexResult<TypeHierarchy> {
    let mut entries = listing.into_iter();

    let (descriptor, items) = match entries.next() {
        Some((key, items)) => {
            let descriptor = if base_type_name(&key) == requested.xml_name {
                requested
            } else {
                catalog.resolve_listing_key(&key)?
            };
            (descriptor, items)
        }
        None => (requested, Vec::new()),
    };

    for (extra, _) in entries {
        warn!("[hierarchy] ignoring extra listing key '{extra}' for {}", descriptor.xml_name);
    }

    let type_name = descriptor.xml_name.as_str();
    let has_child_types = descriptor.has_child_types();
    let expandable = has_child_types || descriptor.in_folder;

    let mut node = TreeNode::for_type(descriptor);
    node.children = items
        .iter()
        .filter_map(|item| {
            let full_name = item_full_name(item);
            if full_name.is_none() {
                warn!("[hierarchy] skipping {type_name} item without a name: {item:?}");
            }
            full_name
        })
        .map(|full_name| {
            trace!("[hierarchy] {type_name} item {full_name}");
            TreeNode::for_item(type_name, &full_name, expandable)
        })
        .collect();
    node.children.sort_by(|a, b| a.title.cmp(&b.title));

    let expansion = if has_child_types {
        let members = node
            .children
            .iter()
            .filter_map(|child| child.full_name.clone())
            .collect();
        Expansion::Children { members }
    } else if descriptor.in_folder {
        Expansion::Folders
    } else {
        Expansion::Final
    };

    Ok(TypeHierarchy {
        descriptor: descriptor.clone(),
        node,
        expansion,
    })
}

/// `fullName`, or the logical name derived from `fileName`.
fn item_full_name(item: &ItemStub) -> Option<String> {
    item.full_name
        .clone()
        .or_else(|| item.file_name.as_deref().and_then(item_name_from_path))
}
