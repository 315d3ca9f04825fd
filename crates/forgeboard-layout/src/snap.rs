// crates/forgeboard-layout/src/snap.rs
use glam::Vec2;

use crate::{CanvasLayout, WidgetBox};

impl CanvasLayout {
    /// Magnetic center snapping while dragging.
    ///
    /// Compares the moving box's center against every other widget's
    /// center; each axis snaps independently when the center distance on
    /// that axis drops below the threshold, so both may snap at once.
    /// `others` must not contain the moving widget itself.
    pub fn snap_to_center(&self, position: Vec2, size: Vec2, others: &[WidgetBox]) -> Vec2 {
        let threshold = self.config.snap_threshold;
        let center = position + size * 0.5;
        let mut snapped = position;

        for other in others {
            let other_center = other.center();
            if (center.x - other_center.x).abs() < threshold {
                snapped.x = other_center.x - size.x * 0.5;
            }
            if (center.y - other_center.y).abs() < threshold {
                snapped.y = other_center.y - size.y * 0.5;
            }
        }

        snapped
    }

    /// Post-drag collision resolution.
    ///
    /// For every other widget whose box overlaps the dropped widget on
    /// one axis, push the dropped widget along the perpendicular axis by
    /// the minimum distance that clears the margin, preferring the side
    /// with the smaller displacement. A fully contained or crossing drop
    /// resolves toward the nearer side. `others` must not contain the
    /// dropped widget itself.
    pub fn resolve_collision(&self, position: Vec2, size: Vec2, others: &[WidgetBox]) -> Vec2 {
        let margin = self.config.margin;
        let (mut x, mut y) = (position.x, position.y);

        for other in others {
            let gap_right = other.left() - (x + size.x);
            let gap_left = x - other.right();
            let gap_below = other.top() - (y + size.y);
            let gap_above = y - other.bottom();

            let overlap_x = !(x + size.x < other.left() || x > other.right());
            let overlap_y = !(y + size.y < other.top() || y > other.bottom());

            // Overlapping horizontally: clear along the y axis.
            if overlap_x {
                if gap_below >= 0.0 && gap_below < margin {
                    y = other.top() - size.y - margin;
                } else if gap_above >= 0.0 && gap_above < margin {
                    y = other.bottom() + margin;
                } else if gap_below < 0.0 && gap_above < 0.0 {
                    if gap_below.abs() < gap_above.abs() {
                        y = other.top() - size.y - margin;
                    } else {
                        y = other.bottom() + margin;
                    }
                }
            }

            // Overlapping vertically: clear along the x axis.
            if overlap_y {
                if gap_right >= 0.0 && gap_right < margin {
                    x = other.left() - size.x - margin;
                } else if gap_left >= 0.0 && gap_left < margin {
                    x = other.right() + margin;
                } else if gap_right < 0.0 && gap_left < 0.0 {
                    if gap_right.abs() < gap_left.abs() {
                        x = other.left() - size.x - margin;
                    } else {
                        x = other.right() + margin;
                    }
                }
            }
        }

        Vec2::new(x, y)
    }
}
