//! Configuration for opening a `FamilyTree`.
//!
//! ```json
//! {
//!   "store": { "kind": "json_file", "path": "family.json" },
//!   "tree_depth": { "limited": 2 }
//! }
//! ```
//!
//! Every field is optional; an empty object gives an in-memory store and
//! unbounded tree views.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::engine::TreeDepth;
use crate::storage::StoreConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub tree_depth: TreeDepth,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
