//! Document tracking.
//!
//! Range navigation needs to know which ranges each document contains and
//! what path to use when linking to it. Both come from `document` vertices
//! and `contains` edges; the project root from the `metaData` vertex is
//! stripped from document URIs.

use lsifnav_core::Id;
use serde::Deserialize;
use std::collections::HashMap;

pub const META_DATA: &str = "metaData";
pub const DOCUMENT: &str = "document";
pub const CONTAINS: &str = "contains";

#[derive(Deserialize)]
struct MetaData {
    #[serde(rename = "projectRoot")]
    project_root: Option<String>,
}

#[derive(Deserialize)]
struct DocumentVertex {
    id: Id,
    uri: String,
}

#[derive(Deserialize)]
struct ContainsEdge {
    #[serde(rename = "outV")]
    out_v: Id,
    #[serde(rename = "inVs")]
    in_vs: Vec<Id>,
}

/// Documents of a dump and the ranges they contain.
#[derive(Debug, Default)]
pub struct Documents {
    project_root: Option<String>,
    uris: HashMap<Id, String>,
    ranges: HashMap<Id, Vec<Id>>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes entries this tracker cares about.
    ///
    /// Returns `Ok(false)` for any other label.
    pub fn read(&mut self, label: &str, payload: &[u8]) -> Result<bool, serde_json::Error> {
        match label {
            META_DATA => {
                let meta: MetaData = serde_json::from_slice(payload)?;
                self.project_root = meta.project_root;
            }
            DOCUMENT => {
                let doc: DocumentVertex = serde_json::from_slice(payload)?;
                self.uris.insert(doc.id, doc.uri);
            }
            CONTAINS => {
                // recorded even before the document vertex is seen; project
                // edges end up here too but are never looked up
                let edge: ContainsEdge = serde_json::from_slice(payload)?;
                self.ranges
                    .entry(edge.out_v)
                    .or_default()
                    .extend(edge.in_vs);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Document ids in ascending order.
    pub fn ids(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.uris.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Ranges contained in `document`, in dump order.
    ///
    /// Empty for ids that are not documents.
    pub fn ranges(&self, document: Id) -> &[Id] {
        if !self.uris.contains_key(&document) {
            return &[];
        }
        self.ranges.get(&document).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Path of `document` relative to the project root.
    pub fn path(&self, document: Id) -> Option<String> {
        self.uris.get(&document).map(|uri| self.relative(uri))
    }

    /// Relative paths of all documents, keyed by id.
    pub fn paths(&self) -> HashMap<Id, String> {
        self.uris
            .iter()
            .map(|(&id, uri)| (id, self.relative(uri)))
            .collect()
    }

    fn relative(&self, uri: &str) -> String {
        if let Some(rest) = self.project_root.as_deref().and_then(|root| {
            let rest = uri.strip_prefix(root.trim_end_matches('/'))?;
            // only whole path segments: root "/app" must not match "/application"
            (rest.is_empty() || rest.starts_with('/')).then_some(rest)
        }) {
            return rest.trim_start_matches('/').to_string();
        }
        uri.strip_prefix("file://").unwrap_or(uri).to_string()
    }
}
