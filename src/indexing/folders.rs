//! Folder materialization: level-3 leaves for folder-scoped types.

use futures_util::future::try_join_all;
use tracing::{error, warn};

use crate::client::MetadataClient;
use crate::debug_event;
use crate::error::{IndexError, IndexResult};
use crate::tree::{TreeNode, join_id};

/// List every level-2 folder of `node` and append its items.
///
/// Folder listings run concurrently; any failure fails the type.
pub(crate) async fn materialize_folders(
    client: &dyn MetadataClient,
    mut node: TreeNode,
    type_name: &str,
) -> IndexResult<TreeNode> {
    let folders: Vec<String> = node
        .children
        .iter()
        .filter_map(|folder| folder.full_name.clone())
        .collect();
    debug_event!("folders", "listing", "{} {type_name} folders", folders.len());

    let requests = folders.iter().map(|folder| async move {
        client
            .list_folder(type_name, folder)
            .await
            .map_err(|source| IndexError::transport(format!("listFolder {type_name}/{folder}"), source))
    });
    let results = try_join_all(requests).await.map_err(|err| {
        error!("[folders] Could not finish indexing {type_name} folders: {err}");
        err
    })?;

    for result in results {
        for (folder_name, items) in result {
            let Some(folder) = node.child_mut(&folder_name) else {
                warn!("[folders] listing returned unknown {type_name} folder '{folder_name}'");
                continue;
            };

            for item in items {
                let Some(full_name) = item.full_name.as_deref() else {
                    warn!("[folders] skipping unnamed item in {type_name}/{folder_name}");
                    continue;
                };
                let (item_folder, name) = full_name
                    .split_once('/')
                    .unwrap_or((folder_name.as_str(), full_name));
                let parent_id = join_id(&[type_name, item_folder]);
                folder.children.push(TreeNode::leaf(&parent_id, 3, name));
            }
        }
    }

    Ok(node)
}
