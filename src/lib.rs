//! In-memory, navigable index of a remote metadata catalog.
//!
//! An [`Indexer`] turns a subscription (a list of metadata type names) into a
//! forest of [`TreeNode`]s up to four levels deep. The [`tree`] module then
//! filters the forest by search text and reconciles it with a flat set of
//! selected ids.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod indexing;
pub mod logging;
pub mod markup;
pub mod naming;
pub mod tree;

pub use catalog::{ChildType, ChildTypeCatalog, TypeCatalog, TypeDescriptor};
pub use client::{ItemStub, ListResult, MetadataClient, RetrieveRequest};
pub use config::Settings;
pub use error::{ClientError, IndexError, IndexResult};
pub use indexing::Indexer;
pub use markup::{MarkupParser, XmlMarkupParser};
pub use tree::{Forest, SelectionState, TreeNode};
