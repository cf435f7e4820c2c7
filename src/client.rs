//! Contract for the remote metadata API.
//!
//! Authentication, transport and retry live behind this trait. The indexer
//! treats any error returned here as fatal for the run.

use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::TypeDescriptor;
use crate::error::ClientError;

/// One entry of a listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStub {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl ItemStub {
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            file_name: None,
        }
    }

    pub fn from_file(file_name: impl Into<String>) -> Self {
        Self {
            full_name: None,
            file_name: Some(file_name.into()),
        }
    }
}

/// Listing response: request key -> items, e.g.
/// `{ "ApexClass": [ { "fullName": "MyClass" } ] }`.
pub type ListResult = IndexMap<String, Vec<ItemStub>>;

/// Retrieval request: type name -> member names.
pub type RetrieveRequest = IndexMap<String, Vec<String>>;

#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Every metadata type the org supports.
    async fn describe(&self) -> Result<Vec<TypeDescriptor>, ClientError>;

    /// List items for a type, using the folder request name for folder types.
    async fn list(&self, request_type: &str) -> Result<ListResult, ClientError>;

    /// List the items inside one folder of a folder-scoped type.
    ///
    /// The result is keyed by folder name; item `fullName`s have the form
    /// `Folder/Name`.
    async fn list_folder(&self, type_name: &str, folder: &str) -> Result<ListResult, ClientError>;

    /// Retrieve file bodies for the requested members into `dest`.
    ///
    /// Files land under `dest/unpackaged/<directoryName>/`.
    async fn retrieve_unpackaged(
        &self,
        request: &RetrieveRequest,
        use_zip: bool,
        dest: &Path,
    ) -> Result<(), ClientError>;
}
