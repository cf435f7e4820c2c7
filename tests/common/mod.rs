//! In-memory metadata client for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use orgindex::{ClientError, ItemStub, ListResult, MetadataClient, RetrieveRequest, TypeDescriptor};

#[derive(Default)]
pub struct FakeClient {
    pub descriptors: Vec<TypeDescriptor>,
    listings: HashMap<String, ListResult>,
    folders: HashMap<String, ListResult>,
    /// Paths relative to `unpackaged/`, with their bodies
    files: Vec<(String, String)>,
    failing: Option<String>,
    pub calls: Mutex<Vec<String>>,
    pub retrievals: Mutex<Vec<(RetrieveRequest, PathBuf)>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            descriptors: vec![
                TypeDescriptor::new("ApexClass", "classes"),
                TypeDescriptor::new("ApexPage", "pages"),
                TypeDescriptor::new("Document", "documents").in_folder(),
                TypeDescriptor::new("EmailTemplate", "email").in_folder(),
                TypeDescriptor::new("CustomObject", "objects")
                    .with_children(["CustomField", "ListView", "ActionOverride"]),
            ],
            ..Default::default()
        }
    }

    pub fn listing(mut self, key: &str, items: &[&str]) -> Self {
        let mut result = ListResult::new();
        result.insert(
            key.to_string(),
            items.iter().map(|name| ItemStub::named(*name)).collect(),
        );
        self.listings.insert(key.to_string(), result);
        self
    }

    pub fn folder(mut self, folder: &str, items: &[&str]) -> Self {
        let mut result = ListResult::new();
        result.insert(
            folder.to_string(),
            items.iter().map(|name| ItemStub::named(*name)).collect(),
        );
        self.folders.insert(folder.to_string(), result);
        self
    }

    pub fn file(mut self, path: &str, body: &str) -> Self {
        self.files.push((path.to_string(), body.to_string()));
        self
    }

    /// Make every call mentioning `operation` fail.
    pub fn failing(mut self, operation: &str) -> Self {
        self.failing = Some(operation.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        let fails = self.failing.as_ref().is_some_and(|f| call.contains(f.as_str()));
        self.calls.lock().unwrap().push(call.clone());
        if fails {
            Err(format!("INVALID_SESSION_ID during {call}").into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MetadataClient for FakeClient {
    async fn describe(&self) -> Result<Vec<TypeDescriptor>, ClientError> {
        self.record("describe".to_string())?;
        Ok(self.descriptors.clone())
    }

    async fn list(&self, request_type: &str) -> Result<ListResult, ClientError> {
        self.record(format!("list {request_type}"))?;
        Ok(self.listings.get(request_type).cloned().unwrap_or_default())
    }

    async fn list_folder(&self, type_name: &str, folder: &str) -> Result<ListResult, ClientError> {
        self.record(format!("listFolder {type_name}/{folder}"))?;
        Ok(self.folders.get(folder).cloned().unwrap_or_default())
    }

    async fn retrieve_unpackaged(
        &self,
        request: &RetrieveRequest,
        _use_zip: bool,
        dest: &Path,
    ) -> Result<(), ClientError> {
        self.record("retrieve".to_string())?;
        self.retrievals
            .lock()
            .unwrap()
            .push((request.clone(), dest.to_path_buf()));

        for (relative, body) in &self.files {
            let path = dest.join("unpackaged").join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body)?;
        }
        Ok(())
    }
}

pub fn object_xml(fields: &[&str]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<CustomObject xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n",
    );
    for field in fields {
        body.push_str(&format!(
            "    <fields>\n        <fullName>{field}</fullName>\n        <type>Text</type>\n    </fields>\n"
        ));
    }
    body.push_str("    <label>Object</label>\n</CustomObject>\n");
    body
}
