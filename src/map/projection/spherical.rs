use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DVec2, DVec3};

use super::{GraticuleStyle, Projected, Projection, ProjectionKind, ProjectionSettings, SurfaceType};
use crate::geo::{lon_lat_to_vec3, normalize_lon, GeoCoordinate, EARTH_RADIUS_M};
use crate::map::viewport::ViewportParams;

/// Nodes of the silhouette outline
const SHAPE_NODES: usize = 180;
/// Angular step of horizon arcs inserted into clipped rings (~5°)
const HORIZON_ARC_STEP: f64 = 0.087;

/// Orthographic view of a rotating sphere.
#[derive(Clone, Debug)]
pub struct SphericalProjection {
    settings: ProjectionSettings,
}

impl SphericalProjection {
    pub fn new() -> Self {
        Self {
            settings: ProjectionSettings::new(-FRAC_PI_2, FRAC_PI_2),
        }
    }
}

impl Default for SphericalProjection {
    fn default() -> Self {
        Self::new()
    }
}

/// View-space vector to screen pixels (y grows downwards).
#[inline(always)]
fn to_screen(view: DVec3, viewport: &ViewportParams) -> DVec2 {
    viewport.center() + DVec2::new(view.x, -view.y) * viewport.radius()
}

impl Projection for SphericalProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Spherical
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Azimuthal
    }

    fn graticule_style(&self) -> GraticuleStyle {
        GraticuleStyle::Spherical
    }

    fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ProjectionSettings {
        &mut self.settings
    }

    fn traversable_poles(&self) -> bool {
        true
    }

    fn traversable_date_line(&self) -> bool {
        true
    }

    fn vertex_coordinates(&self, lon: f64, lat: f64) -> DVec3 {
        lon_lat_to_vec3(lon, lat)
    }

    fn project(&self, coordinate: &GeoCoordinate, viewport: &ViewportParams) -> Projected {
        if viewport.is_degenerate() {
            return Projected::hidden();
        }
        let lat = self.clamp_latitude(coordinate.lat());
        let scale = 1.0 + coordinate.altitude() / EARTH_RADIUS_M;
        let view = viewport.rotate(self.vertex_coordinates(coordinate.lon(), lat) * scale);

        // elevated points on the far side stay visible once they clear the disk
        let globe_hides_point = view.z < 0.0 && view.x * view.x + view.y * view.y < 1.0;
        let on_map = !globe_hides_point && self.lat_bounds().contains(coordinate.lat());
        Projected::new(to_screen(view, viewport), on_map, globe_hides_point, viewport)
    }

    fn geo_coordinates(&self, x: f64, y: f64, viewport: &ViewportParams) -> Option<GeoCoordinate> {
        if viewport.is_degenerate() {
            return None;
        }
        let center = viewport.center();
        let sx = (x - center.x) / viewport.radius();
        let sy = (center.y - y) / viewport.radius();
        let r2 = sx * sx + sy * sy;
        if r2 > 1.0 {
            return None;
        }

        let view = DVec3::new(sx, sy, (1.0 - r2).sqrt());
        let coordinate = GeoCoordinate::from_unit_vector(viewport.unrotate(view), 0.0);
        self.lat_bounds().contains(coordinate.lat()).then_some(coordinate)
    }

    fn map_covers_viewport(&self, viewport: &ViewportParams) -> bool {
        if viewport.is_degenerate() {
            return false;
        }
        let center = viewport.center();
        let r2 = viewport.radius() * viewport.radius();
        // the disk is convex, so checking the corners is enough
        viewport
            .rect()
            .corners()
            .iter()
            .all(|corner| corner.distance_squared(center) <= r2)
    }

    fn map_shape(&self, viewport: &ViewportParams) -> Vec<DVec2> {
        if viewport.is_degenerate() {
            return Vec::new();
        }
        let center = viewport.center();
        (0..SHAPE_NODES)
            .map(|i| {
                let angle = TAU * i as f64 / SHAPE_NODES as f64;
                center + DVec2::from_angle(angle) * viewport.radius()
            })
            .collect()
    }

    fn horizon_crossing(
        &self,
        from: &GeoCoordinate,
        to: &GeoCoordinate,
        viewport: &ViewportParams,
    ) -> Option<DVec2> {
        if viewport.is_degenerate() {
            return None;
        }
        let a = viewport.rotate(from.to_unit_vector());
        let b = viewport.rotate(to.to_unit_vector());
        if (a.z < 0.0) == (b.z < 0.0) {
            return None;
        }
        Some(horizon_point(a, b, viewport.center(), viewport.radius()))
    }

    fn horizon_to_polygon(&self, viewport: &ViewportParams, disappear: DVec2, reappear: DVec2) -> Vec<DVec2> {
        if viewport.is_degenerate() {
            return Vec::new();
        }
        let center = viewport.center();
        let angle_of = |p: DVec2| (p.y - center.y).atan2(p.x - center.x);
        let start = angle_of(disappear);
        let delta = normalize_lon(angle_of(reappear) - start);
        let steps = (delta.abs() / HORIZON_ARC_STEP).ceil() as usize;

        (1..steps)
            .map(|i| {
                let angle = start + delta * i as f64 / steps as f64;
                center + DVec2::from_angle(angle) * viewport.radius()
            })
            .collect()
    }
}

/// Screen point where the view-space chord `last → current` crosses the
/// horizon plane (z = 0), pushed out radially onto the silhouette.
pub fn horizon_point(last: DVec3, current: DVec3, center: DVec2, radius: f64) -> DVec2 {
    let dz = last.z - current.z;
    let t = if dz.abs() < f64::EPSILON { 0.5 } else { (last.z / dz).clamp(0.0, 1.0) };
    let p = last.lerp(current, t);
    let dir = DVec2::new(p.x, -p.y);
    let len = dir.length();
    if len < 1e-12 {
        return center;
    }
    center + dir * (radius / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    fn viewport() -> ViewportParams {
        ViewportParams::new(100.0, DQuat::IDENTITY, 400, 300)
    }

    #[test]
    fn test_center_and_limb() {
        let globe = SphericalProjection::new();
        let vp = viewport();
        let p = globe.screen_coordinates(0.0, 0.0, &vp);
        assert!(p.visible);
        assert_eq!(p.position, DVec2::new(200.0, 150.0));

        let east = globe.screen_coordinates(FRAC_PI_2, 0.0, &vp);
        assert!((east.position - DVec2::new(300.0, 150.0)).length() < 1e-9);
        let north = globe.screen_coordinates(0.0, FRAC_PI_2, &vp);
        assert!((north.position - DVec2::new(200.0, 50.0)).length() < 1e-9);
    }

    #[test]
    fn test_elevated_point_behind_globe() {
        let globe = SphericalProjection::new();
        let vp = viewport();
        let ground = GeoCoordinate::from_degrees(120.0, 0.0);
        assert!(globe.project(&ground, &vp).globe_hides_point);

        let satellite = ground.with_altitude(EARTH_RADIUS_M);
        let p = globe.project(&satellite, &vp);
        assert!(!p.globe_hides_point);
        assert!(p.on_map);

        let behind = GeoCoordinate::from_degrees(180.0, 0.0).with_altitude(EARTH_RADIUS_M);
        assert!(globe.project(&behind, &vp).globe_hides_point);
    }

    #[test]
    fn test_space_pixel_is_off_globe() {
        let globe = SphericalProjection::new();
        let vp = viewport();
        assert!(globe.geo_coordinates(5.0, 5.0, &vp).is_none());
        let c = globe.geo_coordinates(200.0, 150.0, &vp).expect("center is on the globe");
        assert!(c.lon().abs() < 1e-12 && c.lat().abs() < 1e-12);
    }

    #[test]
    fn test_user_lat_bounds_hide_points() {
        let mut globe = SphericalProjection::new();
        globe.set_max_lat(0.5);
        let vp = viewport();
        let p = globe.screen_coordinates(0.0, 0.8, &vp);
        assert!(!p.visible && !p.globe_hides_point);
        assert!(globe.geo_coordinates(200.0, 60.0, &vp).is_none());
    }

    #[test]
    fn test_horizon_point_on_silhouette() {
        let center = DVec2::new(200.0, 150.0);
        let p = horizon_point(DVec3::new(0.6, 0.0, 0.8), DVec3::new(0.6, 0.0, -0.8), center, 100.0);
        assert!((p - DVec2::new(300.0, 150.0)).length() < 1e-9);

        let q = horizon_point(DVec3::new(0.1, 0.3, 0.5), DVec3::new(-0.2, 0.4, -0.9), center, 100.0);
        assert!((q.distance(center) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_covers_viewport_when_zoomed_in() {
        let globe = SphericalProjection::new();
        assert!(!globe.map_covers_viewport(&viewport()));
        let close = ViewportParams::new(300.0, DQuat::IDENTITY, 400, 300);
        assert!(globe.map_covers_viewport(&close));
    }

    #[test]
    fn test_horizon_arc_stays_on_silhouette() {
        let globe = SphericalProjection::new();
        let vp = viewport();
        let center = vp.center();
        let arc = globe.horizon_to_polygon(&vp, center + DVec2::new(100.0, 0.0), center + DVec2::new(0.0, -100.0));
        assert!(!arc.is_empty());
        for p in &arc {
            assert!((p.distance(center) - 100.0).abs() < 1e-9);
            // shorter way round stays in the upper right quadrant
            assert!(p.x > center.x && p.y < center.y);
        }
    }
}
