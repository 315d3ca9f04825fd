// crates/forgeboard-core/src/schema.rs
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::{FeatureId, Result};

/// Per-feature table/column and cache-key requirements, keyed by feature
/// id. Static configuration, loaded once next to the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementSchema {
    #[serde(flatten)]
    pub features: HashMap<FeatureId, FeatureRequirement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureRequirement {
    /// Whether the feature exposes a column-mapping editor at all.
    #[serde(default)]
    pub expandable: bool,
    #[serde(default)]
    pub database: Option<DatabaseRequirement>,
    #[serde(default)]
    pub cache: Option<CacheRequirement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseRequirement {
    /// Tables the feature needs; columns are looked up per table.
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub columns: HashMap<String, ColumnSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnSpec {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

/// Cache key patterns the feature expects to exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheRequirement {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl RequirementSchema {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureRequirement> {
        self.features.get(feature)
    }
}

pub fn load_schema_file(path: impl AsRef<Path>) -> Result<RequirementSchema> {
    let data = std::fs::read_to_string(path)?;
    RequirementSchema::from_json(&data)
}
