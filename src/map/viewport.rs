use glam::{DQuat, DVec2, DVec3};

use crate::geo::GeoCoordinate;

/// Smallest and largest globe radius relative to the viewport width.
const MIN_RADIUS_FACTOR: f64 = 0.175;
const MAX_RADIUS_FACTOR: f64 = 35.0;

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: DVec2,
    pub max: DVec2,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            max: DVec2::new(x + width, y + height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Inclusive on all edges
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in clockwise screen order, starting top-left
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }
}

/// Everything a projection needs to know about the current view.
///
/// The orientation rotates globe-space unit vectors into view space, where x
/// points right, y up and z towards the viewer. Owned by the navigation layer;
/// projections only read it.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportParams {
    radius: f64,
    orientation: DQuat,
    width: usize,
    height: usize,
}

impl ViewportParams {
    pub fn new(radius: f64, orientation: DQuat, width: usize, height: usize) -> Self {
        Self {
            radius,
            orientation,
            width,
            height,
        }
    }

    /// Viewport looking straight down at (lon, lat), given in radians.
    pub fn centered_on(lon: f64, lat: f64, radius: f64, width: usize, height: usize) -> Self {
        Self::new(radius, orientation_for(lon, lat), width, height)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel position of the globe center
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    pub fn rect(&self) -> ScreenRect {
        ScreenRect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Zero radius or zero-sized viewports produce no geometry at all.
    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite() && self.radius > 0.0) || self.width == 0 || self.height == 0
    }

    /// Check if a screen point lies inside the viewport (edges included)
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x <= self.width as f64 && p.y >= 0.0 && p.y <= self.height as f64
    }

    /// Globe space to view space
    #[inline]
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        self.orientation * v
    }

    /// View space to globe space
    #[inline]
    pub fn unrotate(&self, v: DVec3) -> DVec3 {
        self.orientation.inverse() * v
    }

    /// The geographic point the view axis passes through.
    pub fn center_coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::from_unit_vector(self.unrotate(DVec3::Z), 0.0)
    }

    /// Zoom level where 1.0 shows the globe at 35% of the viewport width.
    pub fn zoom(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        self.radius / (self.width as f64 * 0.35)
    }

    /// Set viewport dimensions.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Re-orient so that (lon, lat) in radians faces the viewer with north up.
    pub fn center_on(&mut self, lon: f64, lat: f64) {
        self.orientation = orientation_for(lon, lat);
    }

    /// Rotate the globe by a pixel drag delta; the surface follows the cursor.
    pub fn rotate_by_pixels(&mut self, dx: f64, dy: f64) {
        if self.is_degenerate() {
            return;
        }
        let yaw = DQuat::from_rotation_y(dx / self.radius);
        let pitch = DQuat::from_rotation_x(dy / self.radius);
        self.orientation = (pitch * yaw * self.orientation).normalize();
    }

    /// Scale the globe radius, clamped to a sane range for the viewport width.
    pub fn zoom_by(&mut self, factor: f64) {
        let width = self.width.max(1) as f64;
        self.radius = (self.radius * factor).clamp(width * MIN_RADIUS_FACTOR, width * MAX_RADIUS_FACTOR);
    }
}

/// Orientation that brings (lon, lat) onto the view axis: first spin the
/// longitude to the front, then tilt the latitude down to the equator.
pub fn orientation_for(lon: f64, lat: f64) -> DQuat {
    DQuat::from_rotation_x(lat) * DQuat::from_rotation_y(-lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_identity_center() {
        let vp = ViewportParams::new(200.0, DQuat::IDENTITY, 800, 600);
        let c = vp.center_coordinate();
        assert!(c.lon().abs() < 1e-12);
        assert!(c.lat().abs() < 1e-12);
        assert_eq!(vp.center(), DVec2::new(400.0, 300.0));
    }

    #[test]
    fn test_centered_on() {
        let vp = ViewportParams::centered_on(1.0, FRAC_PI_4, 100.0, 100, 100);
        let c = vp.center_coordinate();
        assert!((c.lon() - 1.0).abs() < 1e-9);
        assert!((c.lat() - FRAC_PI_4).abs() < 1e-9);

        // north pole tilts towards the viewer but stays above the center
        let pole = vp.rotate(DVec3::Y);
        assert!(pole.y > 0.0 && pole.z > 0.0);
        assert!(pole.x.abs() < 1e-12);
    }

    #[test]
    fn test_drag_moves_surface_with_cursor() {
        let mut vp = ViewportParams::new(100.0, DQuat::IDENTITY, 400, 400);
        vp.rotate_by_pixels(10.0, 0.0);
        let front = vp.rotate(DVec3::Z);
        assert!(front.x > 0.0);

        let mut vp = ViewportParams::new(100.0, DQuat::IDENTITY, 400, 400);
        vp.rotate_by_pixels(0.0, 10.0);
        let front = vp.rotate(DVec3::Z);
        assert!(front.y < 0.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(ViewportParams::new(0.0, DQuat::IDENTITY, 100, 100).is_degenerate());
        assert!(ViewportParams::new(10.0, DQuat::IDENTITY, 0, 100).is_degenerate());
        assert!(ViewportParams::new(f64::NAN, DQuat::IDENTITY, 10, 10).is_degenerate());
        assert!(!ViewportParams::new(10.0, DQuat::IDENTITY, 10, 10).is_degenerate());
    }

    #[test]
    fn test_zoom_clamps() {
        let mut vp = ViewportParams::new(100.0, DQuat::IDENTITY, 100, 100);
        vp.zoom_by(1e6);
        assert_eq!(vp.radius(), 3500.0);
        vp.zoom_by(1e-6);
        assert_eq!(vp.radius(), 17.5);
        assert!((vp.zoom() - 0.5).abs() < 1e-12);
    }
}
