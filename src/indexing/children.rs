//! Child materialization: levels 3 and 4 for types whose files embed child
//! declarations (`CustomObject` fields, `Workflow` rules, ...).
//!
//! All level-2 members are retrieved in one request into a fresh directory.
//! Every retrieved file is parsed; tracked child tags become level-3 nodes
//! and their entries level-4 leaves. A file that fails to read or parse is
//! logged and skipped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, error, trace, warn};
use walkdir::WalkDir;

use crate::catalog::{ChildTypeCatalog, TypeDescriptor};
use crate::client::{MetadataClient, RetrieveRequest};
use crate::config::IndexingConfig;
use crate::debug_event;
use crate::error::{IndexError, IndexResult};
use crate::markup::{MarkupParser, MarkupValue};
use crate::naming::item_name_from_path;
use crate::tree::{TreeNode, join_id};

const UNPACKAGED_DIR: &str = "unpackaged";

/// A retrieved file body.
#[derive(Debug)]
pub(crate) struct RetrievedFile {
    pub path: PathBuf,
    pub body: String,
}

/// Where a retrieval lands.
enum RetrieveDir {
    /// Left on disk after the run.
    Retained(PathBuf),
    /// Removed when dropped.
    Scoped(TempDir),
}

impl RetrieveDir {
    fn path(&self) -> &Path {
        match self {
            RetrieveDir::Retained(path) => path,
            RetrieveDir::Scoped(dir) => dir.path(),
        }
    }
}

pub(crate) struct ChildMaterializer<'a> {
    pub client: &'a dyn MetadataClient,
    pub child_types: &'a ChildTypeCatalog,
    pub parser: &'a dyn MarkupParser,
    pub config: &'a IndexingConfig,
}

impl ChildMaterializer<'_> {
    /// Deepen `node` with the child declarations of `members`.
    pub async fn materialize(
        &self,
        mut node: TreeNode,
        descriptor: &TypeDescriptor,
        members: Vec<String>,
    ) -> IndexResult<TreeNode> {
        let xml_name = descriptor.xml_name.as_str();
        if members.is_empty() {
            debug_event!("children", "nothing to retrieve", "{xml_name}");
            return Ok(node);
        }

        let retrieve_dir = self.allocate_dir()?;
        debug_event!(
            "children",
            "retrieving",
            "{} {xml_name} members into {}",
            members.len(),
            retrieve_dir.path().display()
        );

        let mut request = RetrieveRequest::new();
        request.insert(xml_name.to_string(), members);
        self.client
            .retrieve_unpackaged(&request, self.config.use_zip, retrieve_dir.path())
            .await
            .map_err(|source| {
                error!("[children] Could not index metadata type {xml_name}: {source}");
                IndexError::transport(format!("retrieve {xml_name}"), source)
            })?;

        let type_dir = retrieve_dir
            .path()
            .join(UNPACKAGED_DIR)
            .join(&descriptor.directory_name);
        let files = crawl(type_dir).await?;

        for file in &files {
            if let Err(err) = self.apply_file(&mut node, xml_name, file) {
                warn!("[children] {err}");
            }
        }

        if let RetrieveDir::Retained(path) = &retrieve_dir {
            debug_event!("children", "retained", "{}", path.display());
        }
        Ok(node)
    }

    fn allocate_dir(&self) -> IndexResult<RetrieveDir> {
        let root = self
            .config
            .temp_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let dir = tempfile::Builder::new()
            .prefix(&self.config.temp_prefix)
            .tempdir_in(&root)
            .map_err(|source| IndexError::Io { path: root, source })?;

        Ok(if self.config.retain_retrieved {
            RetrieveDir::Retained(dir.keep())
        } else {
            RetrieveDir::Scoped(dir)
        })
    }

    /// Insert the child declarations of one retrieved file.
    pub(crate) fn apply_file(
        &self,
        node: &mut TreeNode,
        xml_name: &str,
        file: &RetrievedFile,
    ) -> IndexResult<()> {
        let Some(base_name) = item_name_from_path(&file.path) else {
            return Ok(());
        };

        let item_id = join_id(&[xml_name, base_name.as_str()]);
        let Some(item) = node.children.iter_mut().find(|c| c.id == item_id) else {
            warn!(
                "[children] no listed item {item_id} for {}",
                file.path.display()
            );
            return Ok(());
        };

        let document = self.parser.parse(&file.body).map_err(|e| IndexError::Parse {
            path: file.path.clone(),
            reason: e.to_string(),
        })?;
        if document.root != xml_name {
            debug!(
                "[children] {} has root <{}>, expected <{xml_name}>",
                file.path.display(),
                document.root
            );
            return Ok(());
        }

        for (tag_name, values) in &document.body {
            let Some(child_type) = self.child_types.by_tag(tag_name) else {
                continue;
            };
            if item.child(tag_name).is_some() {
                trace!("[children] {item_id} already has {tag_name}");
                continue;
            }

            let tag_id = join_id(&[item.id.as_str(), tag_name.as_str()]);
            let leaves = values
                .iter()
                .filter_map(|value| {
                    let key = leaf_key(value);
                    if key.is_none() {
                        error!(
                            "[children] Unrecognized child metadata type {} in {}",
                            child_type.xml_name,
                            file.path.display()
                        );
                    }
                    key
                })
                .map(|key| TreeNode::leaf(&tag_id, 4, key))
                .collect();

            item.children
                .push(TreeNode::branch(&item.id, 3, tag_name, leaves));
        }

        Ok(())
    }
}

/// `fullName` of a child declaration, or `actionName` for action overrides.
///
/// Blank names are not keys: they would collide on the parent id.
fn leaf_key(value: &MarkupValue) -> Option<&str> {
    ["fullName", "actionName"]
        .into_iter()
        .filter_map(|field| value.first_text(field))
        .map(str::trim)
        .find(|key| !key.is_empty())
}

/// Read every file under `dir` off the async runtime.
async fn crawl(dir: PathBuf) -> IndexResult<Vec<RetrievedFile>> {
    tokio::task::spawn_blocking(move || read_tree(&dir))
        .await
        .map_err(|e| IndexError::CrawlTask(e.to_string()))?
}

pub(crate) fn read_tree(dir: &Path) -> IndexResult<Vec<RetrievedFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| {
            error!("[children] Could not crawl retrieved metadata: {source}");
            IndexError::Crawl {
                path: dir.to_path_buf(),
                source,
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        match std::fs::read_to_string(&path) {
            Ok(body) => files.push(RetrievedFile { path, body }),
            Err(e) => warn!("[children] skipping unreadable {}: {e}", path.display()),
        }
    }

    Ok(files)
}
