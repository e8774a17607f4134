use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DVec2, DVec3};

use super::{
    GraticuleStyle, Projected, Projection, ProjectionKind, ProjectionSettings, SurfaceType,
    LAT_LON_ALT_BOX_SAMPLING_RATE,
};
use crate::geo::{normalize_lon, GeoCoordinate};
use crate::map::viewport::ViewportParams;

const STANDARD_PARALLEL_SOUTH: f64 = 20.0 * PI / 180.0;
const STANDARD_PARALLEL_NORTH: f64 = 60.0 * PI / 180.0;
/// Nodes per arc of the annular sector outline
const SHAPE_ARC_NODES: usize = 64;

/// Equidistant conic with standard parallels at 20°N and 60°N.
///
/// Meridians are straight lines through the apex above the north pole,
/// parallels are concentric arcs spaced evenly in latitude. The world is an
/// annular sector; the seam runs along the meridian opposite the center.
#[derive(Clone, Debug)]
pub struct ConicProjection {
    settings: ProjectionSettings,
    /// Cone constant: angle on the map per radian of longitude
    n: f64,
    /// Distance from the apex to the equator, in map units
    g: f64,
}

impl ConicProjection {
    pub fn new() -> Self {
        let (phi1, phi2) = (STANDARD_PARALLEL_SOUTH, STANDARD_PARALLEL_NORTH);
        let n = (phi1.cos() - phi2.cos()) / (phi2 - phi1);
        Self {
            settings: ProjectionSettings::new(-FRAC_PI_2, FRAC_PI_2),
            n,
            g: phi1.cos() / n + phi1,
        }
    }

    #[inline]
    fn rho(&self, lat: f64) -> f64 {
        self.g - self.clamp_latitude(lat)
    }

    /// Center longitude and the apex distance of the center latitude
    fn map_center(&self, viewport: &ViewportParams) -> (f64, f64) {
        let center = viewport.center_coordinate();
        (center.lon(), self.rho(center.lat()))
    }

    /// Screen position for a longitude relative to the center meridian
    fn screen_position(&self, rel: f64, lat: f64, viewport: &ViewportParams) -> DVec2 {
        let (_, rho0) = self.map_center(viewport);
        let v = self.vertex_coordinates(rel, lat);
        viewport.center() + DVec2::new(v.x, -(v.y + rho0)) * viewport.radius()
    }
}

impl Default for ConicProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for ConicProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Conic
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Conical
    }

    fn graticule_style(&self) -> GraticuleStyle {
        GraticuleStyle::Projected
    }

    fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ProjectionSettings {
        &mut self.settings
    }

    /// Apex at the origin, the central meridian pointing down the -y axis.
    fn vertex_coordinates(&self, lon: f64, lat: f64) -> DVec3 {
        let theta = self.n * lon;
        let rho = self.rho(lat);
        DVec3::new(rho * theta.sin(), -rho * theta.cos(), 0.0)
    }

    fn project(&self, coordinate: &GeoCoordinate, viewport: &ViewportParams) -> Projected {
        if viewport.is_degenerate() {
            return Projected::hidden();
        }
        let (center_lon, _) = self.map_center(viewport);
        let rel = normalize_lon(coordinate.lon() - center_lon);
        let position = self.screen_position(rel, coordinate.lat(), viewport);
        let on_map = self.lat_bounds().contains(coordinate.lat());
        Projected::new(position, on_map, false, viewport)
    }

    fn geo_coordinates(&self, x: f64, y: f64, viewport: &ViewportParams) -> Option<GeoCoordinate> {
        if viewport.is_degenerate() {
            return None;
        }
        let (center_lon, rho0) = self.map_center(viewport);
        let center = viewport.center();
        let mx = (x - center.x) / viewport.radius();
        let to_apex = rho0 - (center.y - y) / viewport.radius();

        let rho = mx.hypot(to_apex);
        let rel = mx.atan2(to_apex) / self.n;
        if rel.abs() > PI {
            return None;
        }
        let lat = self.g - rho;
        if !self.lat_bounds().contains(lat) {
            return None;
        }
        Some(GeoCoordinate::from_radians(normalize_lon(center_lon + rel), lat))
    }

    fn map_covers_viewport(&self, viewport: &ViewportParams) -> bool {
        if viewport.is_degenerate() {
            return false;
        }
        let rect = viewport.rect();
        let corners = rect.corners();
        for i in 0..4 {
            let (from, to) = (corners[i], corners[(i + 1) % 4]);
            let steps = ((to - from).length() / LAT_LON_ALT_BOX_SAMPLING_RATE).ceil().max(1.0) as usize;
            for step in 0..=steps {
                let p = from.lerp(to, step as f64 / steps as f64);
                if self.geo_coordinates(p.x, p.y, viewport).is_none() {
                    return false;
                }
            }
        }

        // the hole around the apex can sit entirely inside the viewport
        let (_, rho0) = self.map_center(viewport);
        let apex = viewport.center() - DVec2::new(0.0, rho0 * viewport.radius());
        let nearest = apex.clamp(rect.min, rect.max);
        nearest.distance(apex) >= self.rho(self.max_lat()) * viewport.radius()
    }

    fn map_shape(&self, viewport: &ViewportParams) -> Vec<DVec2> {
        if viewport.is_degenerate() {
            return Vec::new();
        }
        let arc = |lat: f64| {
            (0..=SHAPE_ARC_NODES).map(move |i| (-PI + 2.0 * PI * i as f64 / SHAPE_ARC_NODES as f64, lat))
        };
        let outer = arc(self.min_lat());
        let inner = arc(self.max_lat()).collect::<Vec<_>>();
        outer
            .chain(inner.into_iter().rev())
            .map(|(rel, lat)| self.screen_position(rel, lat, viewport))
            .collect()
    }

    fn seam_longitude(&self, viewport: &ViewportParams) -> Option<f64> {
        let (center_lon, _) = self.map_center(viewport);
        Some(normalize_lon(center_lon + PI))
    }

    fn seam_point(&self, lat: f64, east: bool, viewport: &ViewportParams) -> DVec2 {
        let rel = if east { PI } else { -PI };
        self.screen_position(rel, lat, viewport)
    }
}
