// crates/forgeboard-core/src/widget.rs
use glam::Vec2;

use crate::FeatureId;

/// Stable, typed key for a canvas widget. One widget per enabled
/// infrastructure block, selected mapping-eligible feature, or linked
/// external service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetId {
    Database,
    Cache,
    Feature(FeatureId),
    Service(String),
}

impl WidgetId {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetId::Database => WidgetKind::Database,
            WidgetId::Cache => WidgetKind::Cache,
            WidgetId::Feature(_) => WidgetKind::Feature,
            WidgetId::Service(_) => WidgetKind::Service,
        }
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetId::Database => write!(f, "database"),
            WidgetId::Cache => write!(f, "cache"),
            WidgetId::Feature(id) => write!(f, "feature:{id}"),
            WidgetId::Service(id) => write!(f, "service:{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Database,
    Cache,
    Feature,
    Service,
}

/// A placed rectangle on the canvas. Position is top-left in canvas
/// (unscaled) space, owned by the layout engine once placed; size is
/// fixed per widget kind and supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    pub position: Vec2,
    pub size: Vec2,
}

impl Widget {
    pub fn new(id: WidgetId, position: Vec2, size: Vec2) -> Self {
        Self { id, position, size }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}
