//! Indexing runs: subscription -> listings -> forest.
//!
//! ```text
//! subscription ─┬─ list(TypeA) ─ hierarchy ─┬─ children (retrieve + parse)
//!               ├─ list(TypeB) ─ hierarchy ─┼─ folders  (listFolder × N)
//!               └─ ...                      └─ final
//! ```
//!
//! Every subscribed type is resolved before the first remote call. Listings
//! are issued concurrently and each type is deepened as soon as its own
//! listing arrives. The first fatal error fails the run.

pub mod children;
pub mod folders;
pub mod hierarchy;

pub use hierarchy::{Expansion, TypeHierarchy, build_hierarchy};

use std::sync::Arc;

use futures_util::future::try_join_all;
use indexmap::IndexSet;
use tracing::error;

use crate::catalog::{ChildTypeCatalog, TypeCatalog, TypeDescriptor};
use crate::client::MetadataClient;
use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use crate::markup::{MarkupParser, XmlMarkupParser};
use crate::tree::{Forest, TreeNode};
use crate::{debug_event, log_event};
use children::ChildMaterializer;
use folders::materialize_folders;

/// Builds the metadata forest for a subscription.
pub struct Indexer {
    client: Arc<dyn MetadataClient>,
    catalog: TypeCatalog,
    child_types: ChildTypeCatalog,
    parser: Arc<dyn MarkupParser>,
    settings: Arc<Settings>,
}

impl Indexer {
    /// Create an indexer over an already described catalog.
    pub fn new(client: Arc<dyn MetadataClient>, catalog: TypeCatalog, settings: Arc<Settings>) -> Self {
        Self {
            client,
            catalog,
            child_types: ChildTypeCatalog::standard(),
            parser: Arc::new(XmlMarkupParser),
            settings,
        }
    }

    /// Describe the org once and create an indexer over the result.
    pub async fn connect(client: Arc<dyn MetadataClient>, settings: Arc<Settings>) -> IndexResult<Self> {
        let descriptors = client
            .describe()
            .await
            .map_err(|source| IndexError::transport("describe", source))?;
        debug_event!("indexer", "described", "{} types", descriptors.len());
        Ok(Self::new(client, TypeCatalog::new(descriptors), settings))
    }

    pub fn with_child_types(mut self, child_types: ChildTypeCatalog) -> Self {
        self.child_types = child_types;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn MarkupParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index every subscribed type.
    ///
    /// Duplicate names are indexed once; the forest follows subscription
    /// order. An unknown type fails before any listing is issued.
    pub async fn index<S: AsRef<str>>(&self, subscription: &[S]) -> IndexResult<Forest> {
        let descriptors = self.resolve_subscription(subscription)?;
        debug_event!(
            "indexer",
            "indexing subscription",
            "{:?}",
            descriptors.iter().map(|d| d.xml_name.as_str()).collect::<Vec<_>>()
        );

        let runs = descriptors.into_iter().map(|descriptor| self.index_type(descriptor));
        match try_join_all(runs).await {
            Ok(forest) => {
                log_event!("indexer", "indexed", "{} types", forest.len());
                Ok(forest)
            }
            Err(err) => {
                log_failure("An error occurred indexing server properties", &err);
                Err(err)
            }
        }
    }

    fn resolve_subscription<S: AsRef<str>>(&self, subscription: &[S]) -> IndexResult<Vec<&TypeDescriptor>> {
        let names: IndexSet<&str> = subscription.iter().map(|name| name.as_ref()).collect();
        names
            .into_iter()
            .map(|name| self.catalog.resolve(name))
            .collect()
    }

    async fn index_type(&self, descriptor: &TypeDescriptor) -> IndexResult<TreeNode> {
        let request_name = descriptor.list_request_name();
        let listing = self
            .client
            .list(&request_name)
            .await
            .map_err(|source| IndexError::transport(format!("list {request_name}"), source))?;

        let hierarchy = build_hierarchy(&self.catalog, descriptor, listing)?;
        let type_name = hierarchy.descriptor.xml_name.as_str();

        let deepened = match hierarchy.expansion {
            Expansion::Final => return Ok(hierarchy.node),
            Expansion::Children { members } => {
                let materializer = ChildMaterializer {
                    client: self.client.as_ref(),
                    child_types: &self.child_types,
                    parser: self.parser.as_ref(),
                    config: &self.settings.indexing,
                };
                materializer
                    .materialize(hierarchy.node, &hierarchy.descriptor, members)
                    .await
            }
            Expansion::Folders => {
                materialize_folders(self.client.as_ref(), hierarchy.node, type_name).await
            }
        };

        deepened.map_err(|err| {
            error!("[indexer] Could not index children/folders for {type_name}: {err}");
            err
        })
    }
}

/// Log an error with its source chain.
fn log_failure(context: &str, err: &IndexError) {
    error!("[indexer] {context}: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        error!("[indexer]   caused by: {cause}");
        source = cause.source();
    }
}
