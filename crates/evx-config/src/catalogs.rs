//! Entity catalog locations.

use serde::{Deserialize, Serialize};

fn default_drugs_path() -> String {
    "data/drugs.jsonl".to_string()
}

fn default_targets_path() -> String {
    "data/targets.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// JSONL drug catalog (`{id, name, type, state}` per line).
    #[serde(default = "default_drugs_path")]
    pub drugs_path: String,

    /// JSONL target catalog (`{id, name}` per line).
    #[serde(default = "default_targets_path")]
    pub targets_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            drugs_path: default_drugs_path(),
            targets_path: default_targets_path(),
        }
    }
}
