// crates/forgeboard-layout/src/placement.rs
use glam::Vec2;

use crate::{CanvasLayout, WidgetBox};

/// Bounding envelope of a set of widgets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl CanvasBounds {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

impl CanvasLayout {
    /// Find a free position for a new widget of the given size.
    ///
    /// Grid cells are scanned in row-major order; the first cell whose
    /// margin-expanded box clears every existing widget wins. When the
    /// whole grid is occupied the position degrades to the right of the
    /// grid extent rather than failing.
    pub fn find_free_position(&self, existing: &[WidgetBox], size: Vec2) -> Vec2 {
        let grid = &self.config.grid;
        for row in 0..grid.max_rows {
            for col in 0..grid.max_columns {
                let candidate = self.cell_position(row, col);
                if !self.has_collision(candidate, size, existing, self.config.margin) {
                    tracing::debug!(row, col, x = candidate.x, y = candidate.y, "placed widget");
                    return candidate;
                }
            }
        }

        // Fallback: right of the occupied grid extent.
        let fallback = Vec2::new(
            self.config.start.x + grid.max_columns as f32 * grid.column_width,
            self.config.start.y,
        );
        tracing::debug!(x = fallback.x, y = fallback.y, "grid full, fallback placement");
        fallback
    }

    /// AABB overlap test with the candidate box expanded by `margin` on
    /// all sides. Boxes that merely touch do not collide.
    pub fn has_collision(
        &self,
        position: Vec2,
        size: Vec2,
        existing: &[WidgetBox],
        margin: f32,
    ) -> bool {
        let min = position - Vec2::splat(margin);
        let max = position + size + Vec2::splat(margin);

        existing.iter().any(|widget| {
            max.x > widget.left()
                && min.x < widget.right()
                && max.y > widget.top()
                && min.y < widget.bottom()
        })
    }

    /// Top-left corner of a grid cell.
    pub fn cell_position(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            self.config.start.x + col as f32 * self.config.grid.column_width,
            self.config.start.y + row as f32 * self.config.grid.row_height,
        )
    }

    /// Nearest grid cell corner to an arbitrary position.
    pub fn snap_to_grid(&self, position: Vec2) -> Vec2 {
        let grid = &self.config.grid;
        let col = ((position.x - self.config.start.x) / grid.column_width).round();
        let row = ((position.y - self.config.start.y) / grid.row_height).round();
        Vec2::new(
            self.config.start.x + col * grid.column_width,
            self.config.start.y + row * grid.row_height,
        )
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.config.grid.max_rows && col < self.config.grid.max_columns
    }

    /// Bounding envelope of a widget set, for centering and framing.
    pub fn bounds_of(&self, widgets: &[WidgetBox]) -> CanvasBounds {
        if widgets.is_empty() {
            return CanvasBounds::default();
        }
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for widget in widgets {
            min = min.min(widget.position);
            max = max.max(widget.position + widget.size);
        }
        CanvasBounds { min, max }
    }

    /// Reflow widgets into row-major grid cells, preserving their order.
    pub fn auto_layout(&self, widgets: &mut [WidgetBox]) {
        let columns = self.config.grid.max_columns.max(1);
        for (i, widget) in widgets.iter_mut().enumerate() {
            widget.position = self.cell_position(i / columns, i % columns);
        }
    }
}
