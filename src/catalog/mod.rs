//! Type catalog: remote type descriptors and folder-name transforms.
//!
//! The remote `describe()` call returns one [`TypeDescriptor`] per metadata
//! type. A subscription names types by `xmlName`; anything not in the
//! catalog fails the whole run before a single listing is requested.

pub mod child_types;

pub use child_types::{ChildType, ChildTypeCatalog};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

const FOLDER_SUFFIX: &str = "Folder";
const EMAIL_TEMPLATE: &str = "EmailTemplate";
const EMAIL_FOLDER: &str = "EmailFolder";

/// Remote description of one metadata type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub xml_name: String,
    #[serde(default)]
    pub directory_name: String,
    #[serde(default)]
    pub in_folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_xml_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl TypeDescriptor {
    pub fn new(xml_name: impl Into<String>, directory_name: impl Into<String>) -> Self {
        Self {
            xml_name: xml_name.into(),
            directory_name: directory_name.into(),
            in_folder: false,
            child_xml_names: None,
            suffix: None,
        }
    }

    pub fn in_folder(mut self) -> Self {
        self.in_folder = true;
        self
    }

    pub fn with_children<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.child_xml_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Whether item files embed nested child declarations.
    pub fn has_child_types(&self) -> bool {
        self.child_xml_names
            .as_ref()
            .is_some_and(|names| !names.is_empty())
    }

    /// Name to submit to the listing call for this type.
    pub fn list_request_name(&self) -> String {
        if self.in_folder {
            folder_request_name(&self.xml_name)
        } else {
            self.xml_name.clone()
        }
    }
}

/// Listing name for a folder-scoped type: `Document` -> `DocumentFolder`.
///
/// Email templates are the exception and list as `EmailFolder`.
pub fn folder_request_name(type_name: &str) -> String {
    if type_name == EMAIL_TEMPLATE {
        EMAIL_FOLDER.to_string()
    } else {
        format!("{type_name}{FOLDER_SUFFIX}")
    }
}

/// Inverse of [`folder_request_name`]: `DocumentFolder` -> `Document`.
///
/// Keys without the folder suffix are returned unchanged.
pub fn base_type_name(key: &str) -> &str {
    if key == EMAIL_FOLDER {
        return EMAIL_TEMPLATE;
    }
    key.strip_suffix(FOLDER_SUFFIX).unwrap_or(key)
}

/// Lookup table of every type the remote org describes, keyed by `xmlName`.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let types = descriptors
            .into_iter()
            .map(|d| (d.xml_name.clone(), d))
            .collect();
        Self { types }
    }

    pub fn get(&self, xml_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(xml_name)
    }

    /// Find the descriptor for a subscribed type name.
    pub fn resolve(&self, xml_name: &str) -> IndexResult<&TypeDescriptor> {
        self.get(xml_name).ok_or_else(|| IndexError::UnknownType {
            name: xml_name.to_string(),
        })
    }

    /// Resolve a listing-result key, undoing the folder transform first.
    pub fn resolve_listing_key(&self, key: &str) -> IndexResult<&TypeDescriptor> {
        self.resolve(base_type_name(key))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }
}
