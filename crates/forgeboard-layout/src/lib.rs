// crates/forgeboard-layout/src/lib.rs

use forgeboard_core::{Widget, WidgetKind};
use glam::Vec2;

pub mod placement;
pub mod snap;
pub mod zoom;

pub use placement::*;
pub use snap::*;
pub use zoom::*;

/// Axis-aligned box of one widget as the layout engine sees it. The
/// caller derives these from whatever is currently visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetBox {
    pub position: Vec2,
    pub size: Vec2,
}

impl WidgetBox {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

impl From<&Widget> for WidgetBox {
    fn from(widget: &Widget) -> Self {
        Self::new(widget.position, widget.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub column_width: f32,
    pub row_height: f32,
    pub max_columns: usize,
    pub max_rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_width: 450.0,
            row_height: 300.0,
            max_columns: 3,
            max_rows: 20,
        }
    }
}

/// Placement settings for the canvas: free-position search margin, grid
/// pitch, snap threshold, and per-kind widget dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub margin: f32,
    pub start: Vec2,
    pub grid: GridConfig,
    pub snap_threshold: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            start: Vec2::new(50.0, 50.0),
            grid: GridConfig::default(),
            snap_threshold: 15.0,
        }
    }
}

/// Default widget dimensions per kind. Sizes are caller-supplied input to
/// the engine, not something it computes.
pub fn default_size(kind: WidgetKind) -> Vec2 {
    match kind {
        WidgetKind::Database => Vec2::new(400.0, 300.0),
        WidgetKind::Cache => Vec2::new(400.0, 250.0),
        WidgetKind::Feature => Vec2::new(400.0, 200.0),
        WidgetKind::Service => Vec2::new(180.0, 100.0),
    }
}

/// The spatial layout engine: grid-based free-position search, collision
/// tests, magnetic center snapping and post-drag collision resolution.
/// All coordinates are canvas (unscaled) space; none of the operations
/// can fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasLayout {
    pub config: LayoutConfig,
}

impl CanvasLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }
}
