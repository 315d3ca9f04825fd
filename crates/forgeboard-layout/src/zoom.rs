// crates/forgeboard-layout/src/zoom.rs
use glam::Vec2;

/// Zoom settings for the canvas viewport. Zoom and pan are affine
/// transforms over the canvas as a whole; the layout engine itself
/// always works in canvas (unscaled) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
    pub wheel_sensitivity: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            default: 1.0,
            step: 0.1,
            wheel_sensitivity: 0.005,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }

    /// New zoom factor from a wheel delta (positive delta zooms out).
    pub fn from_wheel_delta(&self, current: f32, delta: f32) -> f32 {
        self.clamp(current - delta * self.wheel_sensitivity)
    }

    pub fn to_percentage(zoom: f32) -> u32 {
        (zoom * 100.0).round() as u32
    }

    pub fn from_percentage(&self, percentage: f32) -> f32 {
        self.clamp(percentage / 100.0)
    }
}

/// Convert a pointer position from screen space to canvas space.
/// Placement and collision functions only accept canvas coordinates.
pub fn screen_to_canvas(point: Vec2, pan: Vec2, zoom: f32) -> Vec2 {
    (point - pan) / zoom
}

pub fn canvas_to_screen(point: Vec2, pan: Vec2, zoom: f32) -> Vec2 {
    point * zoom + pan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_configured_range() {
        let zoom = ZoomConfig::default();
        assert_eq!(zoom.clamp(0.01), 0.1);
        assert_eq!(zoom.clamp(5.0), 3.0);
        assert_eq!(zoom.clamp(1.3), 1.3);
    }

    #[test]
    fn wheel_delta_scales_and_clamps() {
        let zoom = ZoomConfig::default();
        assert_eq!(zoom.from_wheel_delta(1.0, 100.0), 0.5);
        assert_eq!(zoom.from_wheel_delta(1.0, -100.0), 1.5);
        assert_eq!(zoom.from_wheel_delta(0.12, 100.0), 0.1);
    }

    #[test]
    fn percentage_round_trip() {
        let zoom = ZoomConfig::default();
        assert_eq!(ZoomConfig::to_percentage(1.0), 100);
        assert_eq!(ZoomConfig::to_percentage(0.75), 75);
        assert_eq!(zoom.from_percentage(150.0), 1.5);
        assert_eq!(zoom.from_percentage(1000.0), 3.0);
    }

    #[test]
    fn screen_canvas_round_trip() {
        let pan = Vec2::new(40.0, -20.0);
        let zoom = 2.0;
        let screen = Vec2::new(240.0, 180.0);

        let canvas = screen_to_canvas(screen, pan, zoom);
        assert_eq!(canvas, Vec2::new(100.0, 100.0));
        assert_eq!(canvas_to_screen(canvas, pan, zoom), screen);
    }
}
