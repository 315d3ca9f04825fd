// crates/forgeboard-core/src/index.rs
use std::collections::HashMap;

use crate::{Catalog, FeatureId};

/// Flattened view of one catalog node, as stored in the index.
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub id: FeatureId,
    pub name: String,
    pub children: Vec<FeatureId>,
    pub requires_any: Vec<FeatureId>,
    pub exclusive_group: Option<String>,
    pub parent: Option<FeatureId>,
}

/// Immutable id -> node / id -> parent index over the catalog.
///
/// Built once from the static catalog and shared by the dependency
/// resolver and the validator; replaces repeated ad-hoc tree walks.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    nodes: HashMap<FeatureId, IndexedNode>,
    /// Every node id in catalog (depth-first) order. Iteration order of
    /// cleanup passes and reports follows this.
    order: Vec<FeatureId>,
}

impl CatalogIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut nodes = HashMap::new();
        let mut order = Vec::new();

        fn insert(
            node: &crate::FeatureNode,
            parent: Option<&FeatureId>,
            nodes: &mut HashMap<FeatureId, IndexedNode>,
            order: &mut Vec<FeatureId>,
        ) {
            order.push(node.id.clone());
            nodes.insert(
                node.id.clone(),
                IndexedNode {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    children: node.children.iter().map(|c| c.id.clone()).collect(),
                    requires_any: node.requires_any.clone(),
                    exclusive_group: node.exclusive_group.clone(),
                    parent: parent.cloned(),
                },
            );
            for child in &node.children {
                insert(child, Some(&node.id), nodes, order);
            }
        }

        for group in &catalog.groups {
            insert(group, None, &mut nodes, &mut order);
        }

        tracing::debug!(nodes = order.len(), "catalog index built");
        Self { nodes, order }
    }

    pub fn node(&self, id: &str) -> Option<&IndexedNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.node(id).map_or(false, |n| !n.children.is_empty())
    }

    pub fn children_ids(&self, id: &str) -> &[FeatureId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent_id(&self, id: &str) -> Option<&FeatureId> {
        self.node(id).and_then(|n| n.parent.as_ref())
    }

    /// All node ids in catalog (depth-first) order.
    pub fn ids(&self) -> &[FeatureId] {
        &self.order
    }

    /// Ids of every descendant of `id` (children, grandchildren, ...).
    pub fn descendant_ids(&self, id: &str) -> Vec<FeatureId> {
        let mut out = Vec::new();
        let mut stack: Vec<&FeatureId> = match self.node(id) {
            Some(node) => node.children.iter().collect(),
            None => return out,
        };
        while let Some(child) = stack.pop() {
            out.push(child.clone());
            if let Some(node) = self.node(child) {
                stack.extend(node.children.iter());
            }
        }
        out
    }

    /// Path of ids from the top-level group down to `id`, inclusive.
    /// Empty when the id is unknown.
    pub fn path(&self, id: &str) -> Vec<FeatureId> {
        let mut path = Vec::new();
        let mut current = self.node(id);
        while let Some(node) = current {
            path.push(node.id.clone());
            current = node.parent.as_ref().and_then(|p| self.node(p));
        }
        path.reverse();
        path
    }
}
