mod bounds;
mod conic;
mod cylindrical;
mod equirect;
mod mercator;
mod spherical;

pub use conic::ConicProjection;
pub use cylindrical::{Cylindrical, LatitudeScale};
pub use equirect::{Equirect, EquirectProjection};
pub use mercator::{Mercator, MercatorProjection, MERCATOR_MAX_LAT};
pub use spherical::{horizon_point, SphericalProjection};

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geo::{normalize_lon, GeoCoordinate, LatLonAltBox, LineString, LinearRing, TessellationFlags};
use crate::map::region::MapRegion;
use crate::map::tessellation::build_polygons;
use crate::map::viewport::{ScreenRect, ViewportParams};
use crate::map::ScreenPolygon;

/// Pixel spacing of edge samples in [`Projection::lat_lon_alt_box`].
pub const LAT_LON_ALT_BOX_SAMPLING_RATE: f64 = 4.0;

/// Geometric family of a projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Cylindrical,
    Pseudocylindrical,
    Hybrid,
    Conical,
    Pseudoconical,
    Azimuthal,
}

/// Metric property a projection preserves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PreservationType {
    #[default]
    NoPreservation,
    Conformal,
    EqualArea,
}

/// How the graticule generator builds circles for a projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraticuleStyle {
    /// Walk the circle in 3-D and split at the horizon
    Spherical,
    /// Circles are straight horizontal and vertical lines
    Rectangular,
    /// Project geographic nodes one by one
    Projected,
}

/// Closed set of constructible projections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    #[default]
    Spherical,
    Equirect,
    Mercator,
    Conic,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 4] = [
        ProjectionKind::Spherical,
        ProjectionKind::Equirect,
        ProjectionKind::Mercator,
        ProjectionKind::Conic,
    ];

    pub fn build(self) -> Box<dyn Projection> {
        match self {
            ProjectionKind::Spherical => Box::new(SphericalProjection::new()),
            ProjectionKind::Equirect => Box::new(EquirectProjection::new()),
            ProjectionKind::Mercator => Box::new(MercatorProjection::new()),
            ProjectionKind::Conic => Box::new(ConicProjection::new()),
        }
    }

    /// Next kind in display order, wrapping around
    pub fn next(self) -> Self {
        match self {
            ProjectionKind::Spherical => ProjectionKind::Equirect,
            ProjectionKind::Equirect => ProjectionKind::Mercator,
            ProjectionKind::Mercator => ProjectionKind::Conic,
            ProjectionKind::Conic => ProjectionKind::Spherical,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::Spherical => "Globe",
            ProjectionKind::Equirect => "Equirectangular",
            ProjectionKind::Mercator => "Mercator",
            ProjectionKind::Conic => "Equidistant Conic",
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spherical" | "globe" | "orthographic" => Ok(ProjectionKind::Spherical),
            "equirect" | "equirectangular" | "plate-carree" => Ok(ProjectionKind::Equirect),
            "mercator" => Ok(ProjectionKind::Mercator),
            "conic" | "equidistant-conic" => Ok(ProjectionKind::Conic),
            _ => Err(ConfigError::UnknownProjection(s.to_string())),
        }
    }
}

/// User-set latitude window, always inside the projection's valid range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatitudeBounds {
    pub min_lat: f64,
    pub max_lat: f64,
}

impl LatitudeBounds {
    #[inline]
    pub fn contains(&self, lat: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat
    }
}

/// Mutable per-instance state shared by every projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionSettings {
    pub lat_bounds: LatitudeBounds,
    pub repeat_x: bool,
}

impl ProjectionSettings {
    pub fn new(min_lat: f64, max_lat: f64) -> Self {
        Self {
            lat_bounds: LatitudeBounds { min_lat, max_lat },
            repeat_x: false,
        }
    }
}

/// Result of a forward projection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projected {
    pub position: DVec2,
    /// On the map and inside the viewport rectangle
    pub visible: bool,
    /// Drawable: not behind the globe, inside the latitude bounds and the map shape
    pub on_map: bool,
    /// Behind the sphere as seen from the viewer
    pub globe_hides_point: bool,
}

impl Projected {
    pub fn new(position: DVec2, on_map: bool, globe_hides_point: bool, viewport: &ViewportParams) -> Self {
        Self {
            position,
            visible: on_map && viewport.contains(position),
            on_map,
            globe_hides_point,
        }
    }

    /// Nothing to draw, used for degenerate viewports
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Every horizontal position at which a point is drawn on a repeating map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepeatedPosition {
    pub xs: Vec<f64>,
    pub y: f64,
    pub globe_hides_point: bool,
}

impl RepeatedPosition {
    pub fn repeat_count(&self) -> usize {
        self.xs.len()
    }

    pub fn is_visible(&self) -> bool {
        !self.xs.is_empty()
    }
}

/// Where a segment crosses the map seam of a flat projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeamCrossing {
    pub coordinate: GeoCoordinate,
    /// Screen point on the edge the segment leaves through
    pub exit: DVec2,
    /// Screen point on the opposite edge where it comes back
    pub entry: DVec2,
}

/// Conversion between geographic and screen space for one projection family.
///
/// Implementations provide the per-family math; the provided methods hold the
/// geometry every projection shares (tessellation, bounding boxes, latitude
/// handling). Instances keep no per-call scratch state.
pub trait Projection: Send + Sync {
    fn kind(&self) -> ProjectionKind;

    fn surface_type(&self) -> SurfaceType;

    fn preservation_type(&self) -> PreservationType {
        PreservationType::NoPreservation
    }

    fn graticule_style(&self) -> GraticuleStyle;

    fn max_valid_lat(&self) -> f64 {
        FRAC_PI_2
    }

    fn min_valid_lat(&self) -> f64 {
        -FRAC_PI_2
    }

    fn settings(&self) -> &ProjectionSettings;

    fn settings_mut(&mut self) -> &mut ProjectionSettings;

    /// Whether the map can be tiled horizontally
    fn repeatable_x(&self) -> bool {
        false
    }

    fn traversable_poles(&self) -> bool {
        false
    }

    fn traversable_date_line(&self) -> bool {
        false
    }

    fn is_oriented_normal(&self) -> bool {
        true
    }

    /// Placement of (lon, lat) before rotation and scaling: a point on the unit
    /// sphere, or on the unrotated map plane (z = 0) for flat projections.
    fn vertex_coordinates(&self, lon: f64, lat: f64) -> DVec3;

    fn project(&self, coordinate: &GeoCoordinate, viewport: &ViewportParams) -> Projected;

    /// Inverse projection. `None` when the pixel is off the map.
    fn geo_coordinates(&self, x: f64, y: f64, viewport: &ViewportParams) -> Option<GeoCoordinate>;

    /// No background pixels are visible.
    fn map_covers_viewport(&self, viewport: &ViewportParams) -> bool;

    /// Closed outline of the drawable map in screen space.
    fn map_shape(&self, viewport: &ViewportParams) -> Vec<DVec2>;

    /// Longitude where a flat map is cut open, if any.
    fn seam_longitude(&self, _viewport: &ViewportParams) -> Option<f64> {
        None
    }

    /// Screen point on the east or west map edge at the given latitude.
    fn seam_point(&self, _lat: f64, _east: bool, _viewport: &ViewportParams) -> DVec2 {
        DVec2::ZERO
    }

    /// Screen point where the segment between two nodes meets the horizon.
    fn horizon_crossing(
        &self,
        _from: &GeoCoordinate,
        _to: &GeoCoordinate,
        _viewport: &ViewportParams,
    ) -> Option<DVec2> {
        None
    }

    /// Silhouette arc between two horizon points, endpoints excluded.
    fn horizon_to_polygon(&self, _viewport: &ViewportParams, _disappear: DVec2, _reappear: DVec2) -> Vec<DVec2> {
        Vec::new()
    }

    fn lat_bounds(&self) -> LatitudeBounds {
        self.settings().lat_bounds
    }

    fn max_lat(&self) -> f64 {
        self.settings().lat_bounds.max_lat
    }

    fn min_lat(&self) -> f64 {
        self.settings().lat_bounds.min_lat
    }

    fn set_max_lat(&mut self, lat: f64) {
        let lat = lat.clamp(self.min_valid_lat(), self.max_valid_lat()).max(self.min_lat());
        self.settings_mut().lat_bounds.max_lat = lat;
    }

    fn set_min_lat(&mut self, lat: f64) {
        let lat = lat.clamp(self.min_valid_lat(), self.max_valid_lat()).min(self.max_lat());
        self.settings_mut().lat_bounds.min_lat = lat;
    }

    fn repeat_x(&self) -> bool {
        self.repeatable_x() && self.settings().repeat_x
    }

    fn set_repeat_x(&mut self, repeat: bool) {
        let repeat = repeat && self.repeatable_x();
        self.settings_mut().repeat_x = repeat;
    }

    /// Clamp into the valid range, done before any transform.
    fn clamp_latitude(&self, lat: f64) -> f64 {
        lat.clamp(self.min_valid_lat(), self.max_valid_lat())
    }

    fn screen_coordinates(&self, lon: f64, lat: f64, viewport: &ViewportParams) -> Projected {
        self.project(&GeoCoordinate::from_radians(lon, lat), viewport)
    }

    /// Screen position of a visible point.
    fn screen_point(&self, coordinate: &GeoCoordinate, viewport: &ViewportParams) -> Option<DVec2> {
        let projected = self.project(coordinate, viewport);
        projected.visible.then_some(projected.position)
    }

    /// All x positions at which an object of footprint `size` centered on the
    /// point touches the viewport.
    fn screen_coordinates_repeated(
        &self,
        coordinate: &GeoCoordinate,
        viewport: &ViewportParams,
        size: DVec2,
    ) -> RepeatedPosition {
        let projected = self.project(coordinate, viewport);
        let mut result = RepeatedPosition {
            xs: Vec::new(),
            y: projected.position.y,
            globe_hides_point: projected.globe_hides_point,
        };
        if viewport.is_degenerate() || !projected.on_map {
            return result;
        }

        let half = size.abs() / 2.0;
        let (width, height) = (viewport.width() as f64, viewport.height() as f64);
        let y = projected.position.y;
        if y + half.y < 0.0 || y - half.y > height {
            return result;
        }

        let x = projected.position.x;
        if !self.repeat_x() {
            if x + half.x >= 0.0 && x - half.x <= width {
                result.xs.push(x);
            }
            return result;
        }

        let period = map_width(viewport);
        let first = ((-half.x - x) / period).ceil() as i64;
        let last = ((width + half.x - x) / period).floor() as i64;
        result.xs.extend((first..=last).map(|k| x + k as f64 * period));
        result
    }

    /// Where the segment a→b leaves the map through its seam, if it does.
    fn seam_crossing(
        &self,
        a: &GeoCoordinate,
        b: &GeoCoordinate,
        flags: TessellationFlags,
        viewport: &ViewportParams,
    ) -> Option<SeamCrossing> {
        if self.traversable_date_line() {
            return None;
        }
        let seam = self.seam_longitude(viewport)?;

        let (coordinate, exits_east) = if flags.follow_great_circle {
            let va = a.to_unit_vector();
            let vb = b.to_unit_vector();
            // normal of the seam meridian plane, positive just east of the seam
            let normal = DVec3::new(seam.cos(), 0.0, -seam.sin());
            let da = va.dot(normal);
            let db = vb.dot(normal);
            if da * db >= 0.0 {
                return None;
            }
            let t = da / (da - db);
            let p = va.lerp(vb, t);
            // the plane also contains the center meridian
            if p.length_squared() < 1e-24 || p.dot(DVec3::new(seam.sin(), 0.0, seam.cos())) <= 0.0 {
                return None;
            }
            let altitude = a.altitude() + (b.altitude() - a.altitude()) * t;
            // just east of the seam is the west edge of the map
            (GeoCoordinate::from_unit_vector(p, altitude), da < 0.0)
        } else {
            let center = normalize_lon(seam + PI);
            let rel_a = normalize_lon(a.lon() - center);
            let delta = normalize_lon(b.lon() - a.lon());
            if (rel_a + delta).abs() <= PI || delta == 0.0 {
                return None;
            }
            let edge = PI.copysign(delta);
            let t = (edge - rel_a) / delta;
            let lat = a.lat() + (b.lat() - a.lat()) * t;
            let altitude = a.altitude() + (b.altitude() - a.altitude()) * t;
            (GeoCoordinate::from_radians(seam, lat).with_altitude(altitude), delta > 0.0)
        };

        let lat = self.clamp_latitude(coordinate.lat());
        Some(SeamCrossing {
            coordinate,
            exit: self.seam_point(lat, exits_east, viewport),
            entry: self.seam_point(lat, !exits_east, viewport),
        })
    }

    /// Screen polygons for a line string, split wherever it leaves the map.
    fn screen_polygons(&self, line: &LineString, viewport: &ViewportParams) -> Vec<ScreenPolygon> {
        build_polygons(self, line.coordinates(), false, line.flags(), viewport)
    }

    /// Screen polygons for a ring; a ring that stays on the map comes back closed.
    fn screen_polygons_ring(&self, ring: &LinearRing, viewport: &ViewportParams) -> Vec<ScreenPolygon> {
        build_polygons(self, ring.coordinates(), true, ring.flags(), viewport)
    }

    /// Geographic box covering every on-map pixel of `rect`.
    fn lat_lon_alt_box(&self, rect: &ScreenRect, viewport: &ViewportParams) -> LatLonAltBox {
        bounds::sample_lat_lon_alt_box(self, rect, viewport)
    }

    fn exceeds_latitude_range(&self, coordinate: &GeoCoordinate) -> bool {
        !self.lat_bounds().contains(coordinate.lat())
    }

    fn line_exceeds_latitude_range(&self, line: &LineString) -> bool {
        line.coordinates().iter().any(|c| self.exceeds_latitude_range(c))
    }

    /// Pixel region covered by the map shape.
    fn map_region(&self, viewport: &ViewportParams) -> MapRegion {
        if viewport.is_degenerate() {
            return MapRegion::default();
        }
        MapRegion::from_polygon(&self.map_shape(viewport), viewport.width(), viewport.height())
    }
}

/// Width of one copy of a cylindrical map: 2·radius/π px per radian of longitude.
#[inline]
pub fn map_width(viewport: &ViewportParams) -> f64 {
    4.0 * viewport.radius()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    fn viewport() -> ViewportParams {
        ViewportParams::new(200.0, DQuat::IDENTITY, 1000, 800)
    }

    #[test]
    fn test_scenario_center_and_antimeridian() {
        let vp = viewport();
        for kind in [ProjectionKind::Equirect, ProjectionKind::Mercator] {
            let projection = kind.build();
            let center = projection.screen_coordinates(0.0, 0.0, &vp);
            assert!(center.visible, "{kind}");
            assert!((center.position - DVec2::new(500.0, 400.0)).length() < 1e-9);

            let edge = projection.screen_coordinates(PI, 0.0, &vp);
            assert!(edge.visible, "{kind}");
            assert!((edge.position.x - 900.0).abs() < 1e-9);
            assert!((edge.position.y - 400.0).abs() < 1e-9);
        }

        let globe = ProjectionKind::Spherical.build();
        let center = globe.screen_coordinates(0.0, 0.0, &vp);
        assert!(center.visible);
        assert!((center.position - DVec2::new(500.0, 400.0)).length() < 1e-9);
        let back = globe.screen_coordinates(PI, 0.0, &vp);
        assert!(!back.visible);
        assert!(back.globe_hides_point);
    }

    #[test]
    fn test_round_trip_all_projections() {
        let vp = ViewportParams::centered_on(0.4, 0.3, 150.0, 900, 700);
        for kind in ProjectionKind::ALL {
            let projection = kind.build();
            let mut checked = 0;
            for lon in (-170..=170).step_by(17) {
                for lat in (-80..=80).step_by(16) {
                    let c = GeoCoordinate::from_degrees(lon as f64, lat as f64);
                    let p = projection.project(&c, &vp);
                    if !p.visible {
                        continue;
                    }
                    let back = projection
                        .geo_coordinates(p.position.x, p.position.y, &vp)
                        .unwrap_or_else(|| panic!("{kind}: {lon},{lat} visible but off map"));
                    assert!(back.angular_distance(&c) < 1e-6, "{kind}: {lon},{lat}");
                    checked += 1;
                }
            }
            assert!(checked > 10, "{kind}: only {checked} visible samples");
        }
    }

    #[test]
    fn test_visibility_consistency() {
        let vp = ViewportParams::centered_on(-1.2, 0.6, 120.0, 400, 300);
        for kind in ProjectionKind::ALL {
            let projection = kind.build();
            for py in (0..300).step_by(7) {
                for px in (0..400).step_by(7) {
                    let (x, y) = (px as f64 + 0.5, py as f64 + 0.5);
                    if let Some(c) = projection.geo_coordinates(x, y, &vp) {
                        let p = projection.project(&c, &vp);
                        assert!(p.visible, "{kind}: pixel {x},{y}");
                        assert!((p.position - DVec2::new(x, y)).length() < 1e-6, "{kind}: pixel {x},{y}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_lat_bounds_clamped() {
        let mut mercator = ProjectionKind::Mercator.build();
        assert!((mercator.max_lat() - MERCATOR_MAX_LAT).abs() < 1e-12);
        mercator.set_max_lat(FRAC_PI_2);
        assert!((mercator.max_lat() - MERCATOR_MAX_LAT).abs() < 1e-12);

        mercator.set_min_lat(0.5);
        mercator.set_max_lat(0.2);
        assert_eq!(mercator.max_lat(), 0.5);
        assert!(mercator.exceeds_latitude_range(&GeoCoordinate::from_radians(0.0, 0.1)));
        assert!(!mercator.exceeds_latitude_range(&GeoCoordinate::from_radians(0.0, 0.5)));

        let line = LineString::from_degrees(&[(0.0, 50.0), (10.0, 89.0)]);
        assert!(ProjectionKind::Mercator.build().line_exceeds_latitude_range(&line));
        assert!(!ProjectionKind::Spherical.build().line_exceeds_latitude_range(&line));
    }

    #[test]
    fn test_repeat_x_only_when_repeatable() {
        let mut globe = ProjectionKind::Spherical.build();
        globe.set_repeat_x(true);
        assert!(!globe.repeat_x());

        let mut equirect = ProjectionKind::Equirect.build();
        equirect.set_repeat_x(true);
        assert!(equirect.repeat_x());
    }

    #[test]
    fn test_repeated_positions() {
        let vp = ViewportParams::new(100.0, DQuat::IDENTITY, 1000, 400);
        let mut equirect = ProjectionKind::Equirect.build();
        let c = GeoCoordinate::from_radians(0.0, 0.0);

        let single = equirect.screen_coordinates_repeated(&c, &vp, DVec2::new(10.0, 10.0));
        assert_eq!(single.xs, vec![500.0]);

        equirect.set_repeat_x(true);
        let repeated = equirect.screen_coordinates_repeated(&c, &vp, DVec2::new(10.0, 10.0));
        // map width is 400 px, copies at 100, 500 and 900
        assert_eq!(repeated.repeat_count(), 3);
        for (x, expected) in repeated.xs.iter().zip([100.0, 500.0, 900.0]) {
            assert!((x - expected).abs() < 1e-9);
        }
        assert!((repeated.y - 200.0).abs() < 1e-9);

        let globe = ProjectionKind::Spherical.build();
        let hidden = globe.screen_coordinates_repeated(&GeoCoordinate::from_radians(PI, 0.0), &vp, DVec2::ONE);
        assert!(!hidden.is_visible());
        assert!(hidden.globe_hides_point);
    }

    #[test]
    fn test_repeated_position_partly_off_left_edge() {
        let vp = ViewportParams::new(100.0, DQuat::IDENTITY, 200, 400);
        let equirect = ProjectionKind::Equirect.build();
        // 200/PI px per radian puts this point 4 px left of the viewport
        let c = GeoCoordinate::from_radians(-104.0 * PI / 200.0, 0.0);

        let kept = equirect.screen_coordinates_repeated(&c, &vp, DVec2::new(10.0, 10.0));
        assert_eq!(kept.xs.len(), 1);
        assert!((kept.xs[0] + 4.0).abs() < 1e-9);
        assert!((kept.y - 200.0).abs() < 1e-9);

        let dropped = equirect.screen_coordinates_repeated(&c, &vp, DVec2::new(6.0, 6.0));
        assert!(dropped.xs.is_empty());
    }

    #[test]
    fn test_seam_crossing_great_circle_and_linear() {
        let vp = viewport();
        let equirect = ProjectionKind::Equirect.build();
        let a = GeoCoordinate::from_degrees(170.0, 10.0);
        let b = GeoCoordinate::from_degrees(-170.0, 10.0);

        for flags in [TessellationFlags::GREAT_CIRCLE, TessellationFlags::NONE] {
            let crossing = equirect.seam_crossing(&a, &b, flags, &vp).expect("crosses the date line");
            assert!((crossing.coordinate.lon().abs() - PI).abs() < 1e-9);
            assert!((crossing.exit.x - 900.0).abs() < 1e-9);
            assert!((crossing.entry.x - 100.0).abs() < 1e-9);

            let reverse = equirect.seam_crossing(&b, &a, flags, &vp).expect("crosses back");
            assert!((reverse.exit.x - 100.0).abs() < 1e-9);
            assert!((reverse.entry.x - 900.0).abs() < 1e-9);
        }

        let near = GeoCoordinate::from_degrees(-10.0, 0.0);
        let far = GeoCoordinate::from_degrees(10.0, 0.0);
        assert!(equirect.seam_crossing(&near, &far, TessellationFlags::GREAT_CIRCLE, &vp).is_none());
        assert!(ProjectionKind::Spherical
            .build()
            .seam_crossing(&a, &b, TessellationFlags::GREAT_CIRCLE, &vp)
            .is_none());
    }

    #[test]
    fn test_degenerate_viewport() {
        let vp = ViewportParams::new(0.0, DQuat::IDENTITY, 800, 600);
        let empty = ViewportParams::new(100.0, DQuat::IDENTITY, 0, 0);
        let line = LineString::from_degrees(&[(0.0, 0.0), (30.0, 10.0)]);
        for kind in ProjectionKind::ALL {
            let projection = kind.build();
            for vp in [&vp, &empty] {
                assert!(!projection.screen_coordinates(0.0, 0.0, vp).visible);
                assert!(projection.geo_coordinates(400.0, 300.0, vp).is_none());
                assert!(projection.screen_polygons(&line, vp).is_empty());
                assert!(projection.lat_lon_alt_box(&ScreenRect::new(0.0, 0.0, 800.0, 600.0), vp).is_empty());
                assert!(!projection.map_covers_viewport(vp));
                assert!(projection.map_region(vp).is_empty());
            }
        }
    }

    #[test]
    fn test_kind_parse_and_cycle() {
        assert_eq!("Mercator".parse::<ProjectionKind>().ok(), Some(ProjectionKind::Mercator));
        assert_eq!("globe".parse::<ProjectionKind>().ok(), Some(ProjectionKind::Spherical));
        assert!("sinusoidal".parse::<ProjectionKind>().is_err());

        let mut kind = ProjectionKind::Spherical;
        for _ in 0..4 {
            kind = kind.next();
        }
        assert_eq!(kind, ProjectionKind::Spherical);
        assert_eq!(ProjectionKind::Conic.build().surface_type(), SurfaceType::Conical);
        assert_eq!(ProjectionKind::Mercator.build().preservation_type(), PreservationType::Conformal);
    }
}
