use std::f64::consts::PI;
use std::fmt;
use std::marker::PhantomData;

use glam::{DVec2, DVec3};

use super::{
    GraticuleStyle, PreservationType, Projected, Projection, ProjectionKind, ProjectionSettings, SurfaceType,
};
use crate::geo::{normalize_lon, GeoCoordinate};
use crate::map::viewport::ViewportParams;

/// Vertical spacing of a cylindrical projection: maps latitude to map units
/// (radians of longitude at the equator) and back.
pub trait LatitudeScale: Clone + Copy + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: ProjectionKind;
    const PRESERVATION: PreservationType;
    /// Largest latitude the scale can represent
    const MAX_LAT: f64;

    fn forward(lat: f64) -> f64;

    fn inverse(y: f64) -> f64;
}

/// Flat map wrapped around a cylinder touching the equator.
///
/// The map is `4·radius` pixels wide, so one radian of longitude spans
/// `2·radius/π` pixels. The center longitude and latitude come from the
/// viewport orientation.
#[derive(Clone, Debug)]
pub struct Cylindrical<S: LatitudeScale> {
    settings: ProjectionSettings,
    scale: PhantomData<S>,
}

impl<S: LatitudeScale> Cylindrical<S> {
    pub fn new() -> Self {
        Self {
            settings: ProjectionSettings::new(-S::MAX_LAT, S::MAX_LAT),
            scale: PhantomData,
        }
    }

    /// Pixels per radian
    #[inline]
    fn pixel_scale(viewport: &ViewportParams) -> f64 {
        2.0 * viewport.radius() / PI
    }

    /// Center longitude and the map-unit y of the center latitude
    fn map_center(&self, viewport: &ViewportParams) -> (f64, f64) {
        let center = viewport.center_coordinate();
        (center.lon(), S::forward(self.clamp_latitude(center.lat())))
    }

    fn screen_y(&self, lat: f64, viewport: &ViewportParams) -> f64 {
        let (_, center_y) = self.map_center(viewport);
        viewport.center().y - (S::forward(self.clamp_latitude(lat)) - center_y) * Self::pixel_scale(viewport)
    }
}

impl<S: LatitudeScale> Default for Cylindrical<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LatitudeScale> Projection for Cylindrical<S> {
    fn kind(&self) -> ProjectionKind {
        S::KIND
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Cylindrical
    }

    fn preservation_type(&self) -> PreservationType {
        S::PRESERVATION
    }

    fn graticule_style(&self) -> GraticuleStyle {
        GraticuleStyle::Rectangular
    }

    fn max_valid_lat(&self) -> f64 {
        S::MAX_LAT
    }

    fn min_valid_lat(&self) -> f64 {
        -S::MAX_LAT
    }

    fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ProjectionSettings {
        &mut self.settings
    }

    fn repeatable_x(&self) -> bool {
        true
    }

    fn vertex_coordinates(&self, lon: f64, lat: f64) -> DVec3 {
        DVec3::new(lon, S::forward(self.clamp_latitude(lat)), 0.0)
    }

    fn project(&self, coordinate: &GeoCoordinate, viewport: &ViewportParams) -> Projected {
        if viewport.is_degenerate() {
            return Projected::hidden();
        }
        let (center_lon, center_y) = self.map_center(viewport);
        let rel = normalize_lon(coordinate.lon() - center_lon);
        let v = self.vertex_coordinates(rel, coordinate.lat());
        let position = viewport.center() + DVec2::new(v.x, center_y - v.y) * Self::pixel_scale(viewport);

        let on_map = self.lat_bounds().contains(coordinate.lat());
        Projected::new(position, on_map, false, viewport)
    }

    fn geo_coordinates(&self, x: f64, y: f64, viewport: &ViewportParams) -> Option<GeoCoordinate> {
        if viewport.is_degenerate() {
            return None;
        }
        let (center_lon, center_y) = self.map_center(viewport);
        let k = Self::pixel_scale(viewport);
        let center = viewport.center();

        let rel = (x - center.x) / k;
        if rel.abs() > PI && !self.repeat_x() {
            return None;
        }
        let lat = S::inverse((center.y - y) / k + center_y);
        if !self.lat_bounds().contains(lat) {
            return None;
        }
        Some(GeoCoordinate::from_radians(normalize_lon(center_lon + rel), lat))
    }

    fn map_covers_viewport(&self, viewport: &ViewportParams) -> bool {
        if viewport.is_degenerate() {
            return false;
        }
        let shape = self.map_shape(viewport);
        let (top_left, bottom_right) = (shape[0], shape[2]);
        top_left.x <= 0.0
            && top_left.y <= 0.0
            && bottom_right.x >= viewport.width() as f64
            && bottom_right.y >= viewport.height() as f64
    }

    fn map_shape(&self, viewport: &ViewportParams) -> Vec<DVec2> {
        if viewport.is_degenerate() {
            return Vec::new();
        }
        let (west, east) = if self.repeat_x() {
            (0.0, viewport.width() as f64)
        } else {
            let half = 2.0 * viewport.radius();
            (viewport.center().x - half, viewport.center().x + half)
        };
        let top = self.screen_y(self.max_lat(), viewport);
        let bottom = self.screen_y(self.min_lat(), viewport);
        vec![
            DVec2::new(west, top),
            DVec2::new(east, top),
            DVec2::new(east, bottom),
            DVec2::new(west, bottom),
        ]
    }

    fn seam_longitude(&self, viewport: &ViewportParams) -> Option<f64> {
        let (center_lon, _) = self.map_center(viewport);
        Some(normalize_lon(center_lon + PI))
    }

    fn seam_point(&self, lat: f64, east: bool, viewport: &ViewportParams) -> DVec2 {
        let half = 2.0 * viewport.radius();
        let x = if east {
            viewport.center().x + half
        } else {
            viewport.center().x - half
        };
        DVec2::new(x, self.screen_y(lat, viewport))
    }
}
