use glam::DVec2;

use super::ScreenPolygon;

/// Drawing backend for screen geometry.
pub trait Painter {
    fn set_antialiasing(&mut self, enabled: bool);

    /// Connect consecutive points.
    fn draw_polyline(&mut self, points: &[DVec2]);

    /// Connect consecutive points and close back to the first.
    fn draw_polygon(&mut self, points: &[DVec2]);

    fn draw_screen_polygon(&mut self, polygon: &ScreenPolygon) {
        if polygon.closed {
            self.draw_polygon(&polygon.points);
        } else {
            self.draw_polyline(&polygon.points);
        }
    }
}
