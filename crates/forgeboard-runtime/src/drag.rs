// crates/forgeboard-runtime/src/drag.rs
use forgeboard_core::WidgetId;
use forgeboard_layout::{CanvasLayout, WidgetBox};
use glam::Vec2;

/// Drag interaction state. Dragging is a short-lived, exclusive gesture:
/// only one widget moves at a time, and a second press while dragging is
/// ignored until the first gesture commits.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        widget: WidgetId,
        /// Offset from the grab point to the widget origin, fixed for
        /// the whole gesture.
        grab_offset: Vec2,
        size: Vec2,
        /// Latest (snapped) position, committed on release.
        position: Vec2,
    },
}

/// Two-state machine for pointer-driven widget dragging. All positions
/// are canvas space; the caller converts pointer coordinates through the
/// current zoom factor first.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self { state: DragState::Idle }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active_widget(&self) -> Option<&WidgetId> {
        match &self.state {
            DragState::Dragging { widget, .. } => Some(widget),
            DragState::Idle => None,
        }
    }

    /// Pointer-down on a widget header. Ignored while another gesture is
    /// in flight, and for zero-size widgets.
    pub fn begin(&mut self, widget: WidgetId, pointer: Vec2, origin: Vec2, size: Vec2) -> bool {
        if self.is_dragging() {
            tracing::debug!(widget = %widget, "drag ignored, gesture already in flight");
            return false;
        }
        if size.x <= 0.0 || size.y <= 0.0 {
            tracing::debug!(widget = %widget, "drag ignored, zero-size widget");
            return false;
        }
        self.state = DragState::Dragging {
            widget,
            grab_offset: pointer - origin,
            size,
            position: origin,
        };
        true
    }

    /// Pointer movement: live center snapping for visual feedback. The
    /// returned position is not committed anywhere; `others` must exclude
    /// the dragged widget.
    pub fn update(
        &mut self,
        pointer: Vec2,
        layout: &CanvasLayout,
        others: &[WidgetBox],
    ) -> Option<Vec2> {
        match &mut self.state {
            DragState::Dragging { grab_offset, size, position, .. } => {
                let raw = pointer - *grab_offset;
                let snapped = layout.snap_to_center(raw, *size, others);
                *position = snapped;
                Some(snapped)
            }
            DragState::Idle => None,
        }
    }

    /// Pointer release: resolve any remaining overlap and return the
    /// final position for the caller to commit into the widget record.
    pub fn end(&mut self, layout: &CanvasLayout, others: &[WidgetBox]) -> Option<(WidgetId, Vec2)> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { widget, size, position, .. } => {
                let resolved = layout.resolve_collision(position, size, others);
                Some((widget, resolved))
            }
            DragState::Idle => None,
        }
    }

    /// Abort the gesture without committing.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DragController {
        DragController::new()
    }

    #[test]
    fn second_press_is_ignored_until_release() {
        let mut drag = controller();
        let layout = CanvasLayout::default();

        assert!(drag.begin(
            WidgetId::Database,
            Vec2::new(60.0, 60.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(400.0, 300.0),
        ));
        assert!(!drag.begin(
            WidgetId::Cache,
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(400.0, 250.0),
        ));
        assert_eq!(drag.active_widget(), Some(&WidgetId::Database));

        drag.end(&layout, &[]);
        assert!(!drag.is_dragging());
        assert!(drag.begin(
            WidgetId::Cache,
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(400.0, 250.0),
        ));
    }

    #[test]
    fn zero_size_widget_cannot_be_dragged() {
        let mut drag = controller();
        assert!(!drag.begin(WidgetId::Database, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn grab_offset_is_preserved_across_moves() {
        let mut drag = controller();
        let layout = CanvasLayout::default();

        drag.begin(
            WidgetId::Database,
            Vec2::new(70.0, 90.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(400.0, 300.0),
        );
        // No snap anchors around: position follows the pointer minus the
        // 20/40 grab offset.
        let pos = drag.update(Vec2::new(300.0, 340.0), &layout, &[]).unwrap();
        assert_eq!(pos, Vec2::new(280.0, 300.0));
    }

    #[test]
    fn release_resolves_collision_and_resets_state() {
        let mut drag = controller();
        let layout = CanvasLayout::default();
        let others = vec![WidgetBox::new(Vec2::new(100.0, 300.0), Vec2::new(400.0, 300.0))];

        drag.begin(
            WidgetId::Cache,
            Vec2::ZERO,
            Vec2::new(120.0, 40.0),
            Vec2::new(400.0, 250.0),
        );
        // Drop 10px above the other widget's margin band
        drag.update(Vec2::new(0.0, 0.0), &layout, &others);
        let (widget, position) = drag.end(&layout, &others).unwrap();

        assert_eq!(widget, WidgetId::Cache);
        // Pushed up to clear the 50px margin above the other widget
        assert_eq!(position.y, 300.0 - 250.0 - 50.0);
        assert!(!drag.is_dragging());
        assert!(drag.end(&layout, &others).is_none());
    }

    #[test]
    fn update_without_gesture_is_none() {
        let mut drag = controller();
        let layout = CanvasLayout::default();
        assert!(drag.update(Vec2::new(10.0, 10.0), &layout, &[]).is_none());
    }
}
