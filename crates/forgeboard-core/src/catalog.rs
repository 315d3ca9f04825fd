// crates/forgeboard-core/src/catalog.rs
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::Result;

pub type FeatureId = String;

/// One selectable feature in the hierarchical catalog.
///
/// Top-level nodes act as category groups; any node may carry children,
/// a prerequisite rule and a mutual-exclusion tag. The catalog is static
/// configuration: deserialized once at startup, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureNode {
    pub id: FeatureId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub children: Vec<FeatureNode>,
    /// Selectable only if at least one of these ids is satisfied.
    #[serde(default)]
    pub requires_any: Vec<FeatureId>,
    /// At most one node sharing a tag may be selected at any time.
    #[serde(default)]
    pub exclusive_group: Option<String>,
}

impl FeatureNode {
    pub fn leaf(id: impl Into<FeatureId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            note: None,
            children: Vec::new(),
            requires_any: Vec::new(),
            exclusive_group: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Ordered forest of top-level feature groups.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    pub groups: Vec<FeatureNode>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Depth-first walk over every node, groups included.
    pub fn for_each_node<'a>(&'a self, mut f: impl FnMut(&'a FeatureNode)) {
        fn walk<'a>(node: &'a FeatureNode, f: &mut impl FnMut(&'a FeatureNode)) {
            f(node);
            for child in &node.children {
                walk(child, f);
            }
        }
        for group in &self.groups {
            walk(group, &mut f);
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.for_each_node(|_| count += 1);
        count
    }
}

pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog> {
    let data = std::fs::read_to_string(path)?;
    Catalog::from_json(&data)
}

/// Static link table from features to the external services they imply.
///
/// The services themselves are opaque to the core; only their ids and
/// display metadata travel through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceLinks {
    #[serde(default)]
    pub services: HashMap<String, ServiceInfo>,
    /// feature id -> service ids implied by selecting it
    #[serde(default)]
    pub links: HashMap<FeatureId, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ServiceLinks {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Service ids implied by the given selected features, deduplicated,
    /// in first-seen order.
    pub fn required_services<'a>(
        &self,
        selected: impl IntoIterator<Item = &'a FeatureId>,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for feature in selected {
            if let Some(linked) = self.links.get(feature) {
                for service in linked {
                    if !out.contains(service) {
                        out.push(service.clone());
                    }
                }
            }
        }
        out
    }
}
