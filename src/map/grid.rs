//! Latitude/longitude graticule as screen polygons.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DVec2, DVec3};
use tracing::debug;

use crate::geo::{lon_lat_to_vec3, normalize_lon, GeoCoordinate, TessellationFlags};
use crate::map::projection::{horizon_point, map_width, GraticuleStyle, Projection};
use crate::map::tessellation::build_polygons;
use crate::map::viewport::ViewportParams;
use crate::map::{Painter, ScreenPolygon};

/// Nodes per quarter circle
pub const DEFAULT_PRECISION: usize = 20;
/// Fraction of the way to the pole trimmed off minor meridians
pub const LON_CUT_COEFF: f64 = 1.0 / 6.0;
/// Obliquity of the ecliptic, the latitude of the tropics
pub const TROPIC_LAT: f64 = 0.409_092_804_22;
/// Keeps projected parallels off the seam itself
const SEAM_MARGIN: f64 = 1e-9;

/// Which coordinate a circle holds constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SphereDim {
    /// Meridian pair at `λ` and `λ + π`
    Longitude,
    /// Parallel
    Latitude,
}

/// Builds graticule circles for the current viewport and hands them to a
/// painter. Circles accumulate until [`GridMap::clear`] or a resize.
#[derive(Clone, Debug)]
pub struct GridMap {
    precision: usize,
    size: (usize, usize),
    center: DVec2,
    polygons: Vec<ScreenPolygon>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new()
    }
}

impl GridMap {
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            size: (0, 0),
            center: DVec2::ZERO,
            polygons: Vec::new(),
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision.max(1);
        self.polygons.clear();
    }

    pub fn polygons(&self) -> &[ScreenPolygon] {
        &self.polygons
    }

    pub fn clear(&mut self) {
        self.polygons.clear();
    }

    /// Recompute the cached center and drop circles built for the old size.
    pub fn resize_map(&mut self, width: usize, height: usize) {
        self.size = (width, height);
        self.center = DVec2::new(width as f64 / 2.0, height as f64 / 2.0);
        self.polygons.clear();
        debug!(width, height, "grid map resized");
    }

    fn sync_viewport(&mut self, viewport: &ViewportParams) {
        if self.size != (viewport.width(), viewport.height()) {
            self.resize_map(viewport.width(), viewport.height());
        }
    }

    /// Add one circle. For longitudes `cut_coeff` trims the part closer than
    /// `cut_coeff · 90°` to either pole.
    pub fn create_circle(
        &mut self,
        value: f64,
        dim: SphereDim,
        projection: &dyn Projection,
        viewport: &ViewportParams,
        cut_coeff: f64,
    ) {
        if viewport.is_degenerate() {
            return;
        }
        self.sync_viewport(viewport);
        let polygons = match projection.graticule_style() {
            GraticuleStyle::Spherical => self.spherical_circle(value, dim, viewport, cut_coeff),
            GraticuleStyle::Rectangular => rectangular_circle(value, dim, projection, viewport, cut_coeff),
            GraticuleStyle::Projected => self.projected_circle(value, dim, projection, viewport, cut_coeff),
        };
        self.polygons.extend(polygons);
    }

    /// `lat_num - 1` parallels and `lon_num` meridian pairs, evenly spaced.
    /// Every third meridian pair runs all the way to the poles.
    pub fn create_circles(
        &mut self,
        lon_num: usize,
        lat_num: usize,
        projection: &dyn Projection,
        viewport: &ViewportParams,
    ) {
        for i in 1..lat_num {
            let lat = -FRAC_PI_2 + i as f64 * PI / lat_num as f64;
            self.create_circle(lat, SphereDim::Latitude, projection, viewport, 0.0);
        }
        for i in 0..lon_num {
            let lon = i as f64 * PI / lon_num as f64;
            let cut = if i % 3 == 0 { 0.0 } else { LON_CUT_COEFF };
            self.create_circle(lon, SphereDim::Longitude, projection, viewport, cut);
        }
    }

    /// 15° graticule.
    pub fn create_grid(&mut self, projection: &dyn Projection, viewport: &ViewportParams) {
        self.create_circles(12, 12, projection, viewport);
        debug!(polygons = self.polygons.len(), projection = %projection.kind(), "grid created");
    }

    pub fn create_equator(&mut self, projection: &dyn Projection, viewport: &ViewportParams) {
        self.create_circle(0.0, SphereDim::Latitude, projection, viewport, 0.0);
    }

    /// Tropics of Cancer and Capricorn plus the polar circles.
    pub fn create_tropics(&mut self, projection: &dyn Projection, viewport: &ViewportParams) {
        for lat in [TROPIC_LAT, -TROPIC_LAT, FRAC_PI_2 - TROPIC_LAT, TROPIC_LAT - FRAC_PI_2] {
            self.create_circle(lat, SphereDim::Latitude, projection, viewport, 0.0);
        }
    }

    pub fn paint_grid_map(&self, painter: &mut dyn Painter, antialiasing: bool) {
        painter.set_antialiasing(antialiasing);
        for polygon in &self.polygons {
            painter.draw_screen_polygon(polygon);
        }
    }

    fn spherical_circle(
        &self,
        value: f64,
        dim: SphereDim,
        viewport: &ViewportParams,
        cut_coeff: f64,
    ) -> Vec<ScreenPolygon> {
        let steps = 4 * self.precision;
        let max_lat = (1.0 - cut_coeff) * FRAC_PI_2;
        let mut tracker = CircleTracker::new(self.center, viewport.radius());

        for i in 0..=steps {
            let t = -PI + TAU * i as f64 / steps as f64;
            let point = match dim {
                SphereDim::Latitude => lon_lat_to_vec3(t, value),
                SphereDim::Longitude => {
                    let (sin_lon, cos_lon) = value.sin_cos();
                    let (sin_t, cos_t) = t.sin_cos();
                    if sin_t.abs() > max_lat.sin() {
                        tracker.cut();
                        continue;
                    }
                    DVec3::new(cos_t * sin_lon, sin_t, cos_t * cos_lon)
                }
            };
            tracker.step(viewport.rotate(point));
        }
        tracker.finish()
    }

    fn projected_circle(
        &self,
        value: f64,
        dim: SphereDim,
        projection: &dyn Projection,
        viewport: &ViewportParams,
        cut_coeff: f64,
    ) -> Vec<ScreenPolygon> {
        let center_lon = viewport.center_coordinate().lon();
        match dim {
            SphereDim::Latitude => {
                let steps = 4 * self.precision;
                let span = PI - SEAM_MARGIN;
                let coordinates: Vec<GeoCoordinate> = (0..=steps)
                    .map(|i| {
                        let rel = -span + 2.0 * span * i as f64 / steps as f64;
                        GeoCoordinate::from_radians(normalize_lon(center_lon + rel), value)
                    })
                    .collect();
                build_polygons(projection, &coordinates, false, TessellationFlags::NONE, viewport)
            }
            SphereDim::Longitude => {
                let steps = 2 * self.precision;
                let max_lat = (1.0 - cut_coeff) * FRAC_PI_2;
                [value, value + PI]
                    .into_iter()
                    .flat_map(|lon| {
                        let coordinates: Vec<GeoCoordinate> = (0..=steps)
                            .map(|i| {
                                let lat = -max_lat + 2.0 * max_lat * i as f64 / steps as f64;
                                GeoCoordinate::from_radians(normalize_lon(lon), lat)
                            })
                            .collect();
                        build_polygons(projection, &coordinates, false, TessellationFlags::NONE, viewport)
                    })
                    .collect()
            }
        }
    }
}

/// Straight lines for maps where parallels and meridians are axis aligned.
fn rectangular_circle(
    value: f64,
    dim: SphereDim,
    projection: &dyn Projection,
    viewport: &ViewportParams,
    cut_coeff: f64,
) -> Vec<ScreenPolygon> {
    match dim {
        SphereDim::Latitude => {
            if !projection.lat_bounds().contains(value) {
                return Vec::new();
            }
            let west = projection.seam_point(value, false, viewport);
            let east = projection.seam_point(value, true, viewport);
            let (x0, x1) = if projection.repeat_x() {
                (0.0, viewport.width() as f64)
            } else {
                (west.x, east.x)
            };
            vec![ScreenPolygon::open(vec![DVec2::new(x0, west.y), DVec2::new(x1, west.y)])]
        }
        SphereDim::Longitude => {
            let limit = (1.0 - cut_coeff) * FRAC_PI_2;
            let top = projection.max_lat().min(limit);
            let bottom = projection.min_lat().max(-limit);
            if top <= bottom {
                return Vec::new();
            }
            let west_edge = projection.seam_point(0.0, false, viewport).x;
            let east_edge = projection.seam_point(0.0, true, viewport).x;

            let mut xs = Vec::new();
            for lon in [value, value + PI] {
                let x = projection.screen_coordinates(normalize_lon(lon), 0.0, viewport).position.x;
                xs.push(x);
                // a meridian on the seam is both map edges
                if !projection.repeat_x() && (x - east_edge).abs() < 1e-9 {
                    xs.push(west_edge);
                }
            }
            if projection.repeat_x() {
                let period = map_width(viewport);
                let width = viewport.width() as f64;
                xs = xs
                    .into_iter()
                    .flat_map(|x| {
                        let first = (-x / period).ceil() as i64;
                        let last = ((width - x) / period).floor() as i64;
                        (first..=last).map(move |k| x + k as f64 * period)
                    })
                    .collect();
            }

            let y_top = projection.screen_coordinates(value, top, viewport).position.y;
            let y_bottom = projection.screen_coordinates(value, bottom, viewport).position.y;
            xs.into_iter()
                .map(|x| ScreenPolygon::open(vec![DVec2::new(x, y_top), DVec2::new(x, y_bottom)]))
                .collect()
        }
    }
}

/// Fold state while walking one circle around the globe: visibility of the
/// previous node and the run being built.
struct CircleTracker {
    center: DVec2,
    radius: f64,
    runs: Vec<Vec<DVec2>>,
    current: Vec<DVec2>,
    last: Option<(DVec3, bool)>,
    first_visible: Option<bool>,
    last_visible: bool,
    broken: bool,
}

impl CircleTracker {
    fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius,
            runs: Vec::new(),
            current: Vec::new(),
            last: None,
            first_visible: None,
            last_visible: false,
            broken: false,
        }
    }

    fn step(&mut self, view: DVec3) {
        let visible = view.z >= 0.0;
        let screen = self.center + DVec2::new(view.x, -view.y) * self.radius;

        match self.last {
            None => {
                if visible {
                    self.current.push(screen);
                }
            }
            Some((last, last_visible)) => match (last_visible, visible) {
                (true, true) => self.current.push(screen),
                (true, false) => {
                    self.current.push(horizon_point(last, view, self.center, self.radius));
                    self.flush();
                    self.broken = true;
                }
                (false, true) => {
                    self.current.push(horizon_point(last, view, self.center, self.radius));
                    self.current.push(screen);
                    self.broken = true;
                }
                (false, false) => {}
            },
        }

        self.first_visible.get_or_insert(visible);
        self.last_visible = visible;
        self.last = Some((view, visible));
    }

    /// Skip a trimmed node: end the run without a horizon point.
    fn cut(&mut self) {
        self.flush();
        self.last = None;
        self.last_visible = false;
        self.broken = true;
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.runs.push(std::mem::take(&mut self.current));
        }
    }

    /// The walk starts and ends on the same node.
    fn finish(mut self) -> Vec<ScreenPolygon> {
        self.flush();
        let mut runs = self.runs;

        if !self.broken {
            return runs
                .pop()
                .map(|mut points| {
                    points.pop();
                    points
                })
                .filter(|points| points.len() >= 3)
                .map(ScreenPolygon::closed)
                .into_iter()
                .collect();
        }

        // a run through the start node was cut in two by the walk
        if self.first_visible == Some(true) && self.last_visible && runs.len() >= 2 {
            let first = runs.remove(0);
            if let Some(last) = runs.last_mut() {
                last.extend(first.into_iter().skip(1));
            }
        }

        runs.into_iter()
            .filter(|points| points.len() >= 2)
            .map(ScreenPolygon::open)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::ProjectionKind;
    use glam::DQuat;

    #[derive(Default)]
    struct RecordingPainter {
        antialiasing: bool,
        polylines: usize,
        polygons: usize,
    }

    impl Painter for RecordingPainter {
        fn set_antialiasing(&mut self, enabled: bool) {
            self.antialiasing = enabled;
        }

        fn draw_polyline(&mut self, _points: &[DVec2]) {
            self.polylines += 1;
        }

        fn draw_polygon(&mut self, _points: &[DVec2]) {
            self.polygons += 1;
        }
    }

    fn on_silhouette(p: DVec2, vp: &ViewportParams) -> bool {
        (p.distance(vp.center()) - vp.radius()).abs() < 1e-9
    }

    #[test]
    fn test_visible_circle_is_closed() {
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::centered_on(0.0, FRAC_PI_2, 150.0, 400, 400);
        let mut grid = GridMap::new();
        grid.create_circle(PI / 4.0, SphereDim::Latitude, globe.as_ref(), &vp, 0.0);

        assert_eq!(grid.polygons().len(), 1);
        let circle = &grid.polygons()[0];
        assert!(circle.closed);
        assert_eq!(circle.len(), 4 * DEFAULT_PRECISION);
        let expected = 150.0 * (PI / 4.0).cos();
        assert!(circle.points.iter().all(|p| (p.distance(vp.center()) - expected).abs() < 1e-9));
    }

    #[test]
    fn test_straddling_circles_end_on_horizon() {
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::new(150.0, DQuat::IDENTITY, 400, 400);
        let mut grid = GridMap::new();
        grid.create_circle(0.5, SphereDim::Latitude, globe.as_ref(), &vp, 0.0);
        grid.create_circle(0.3, SphereDim::Longitude, globe.as_ref(), &vp, 0.0);
        grid.create_equator(globe.as_ref(), &vp);

        assert_eq!(grid.polygons().len(), 3);
        for polygon in grid.polygons() {
            assert!(!polygon.closed);
            assert!(on_silhouette(polygon.first().unwrap_or_default(), &vp));
            assert!(on_silhouette(polygon.last().unwrap_or_default(), &vp));
        }
    }

    #[test]
    fn test_visible_start_is_joined() {
        // the walk starts at lon -180, which faces the viewer here
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::centered_on(PI, 0.0, 150.0, 400, 400);
        let mut grid = GridMap::new();
        grid.create_circle(0.5, SphereDim::Latitude, globe.as_ref(), &vp, 0.0);

        assert_eq!(grid.polygons().len(), 1);
        let arc = &grid.polygons()[0];
        assert!(on_silhouette(arc.first().unwrap_or_default(), &vp));
        assert!(on_silhouette(arc.last().unwrap_or_default(), &vp));
    }

    #[test]
    fn test_cut_meridian_stops_short_of_pole() {
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::new(150.0, DQuat::IDENTITY, 400, 400);
        let mut grid = GridMap::new();
        grid.create_circle(0.3, SphereDim::Longitude, globe.as_ref(), &vp, LON_CUT_COEFF);

        assert_eq!(grid.polygons().len(), 1);
        let meridian = &grid.polygons()[0];
        for end in [meridian.first(), meridian.last()] {
            let end = end.unwrap_or_default();
            assert!(end.distance(vp.center()) < 150.0 - 1.0);
        }
    }

    #[test]
    fn test_full_grid_on_globe() {
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::centered_on(0.2, 0.4, 150.0, 400, 400);
        let mut grid = GridMap::new();
        grid.create_grid(globe.as_ref(), &vp);
        // the -75° parallel is entirely on the far side
        assert!(grid.polygons().len() >= 10 + 12);

        let mut painter = RecordingPainter::default();
        grid.paint_grid_map(&mut painter, true);
        assert!(painter.antialiasing);
        assert_eq!(painter.polylines + painter.polygons, grid.polygons().len());

        grid.resize_map(800, 600);
        assert!(grid.polygons().is_empty());
    }

    #[test]
    fn test_rectangular_lines() {
        let equirect = ProjectionKind::Equirect.build();
        let vp = ViewportParams::new(200.0, DQuat::IDENTITY, 1000, 800);
        let mut grid = GridMap::new();
        grid.create_equator(equirect.as_ref(), &vp);
        assert_eq!(
            grid.polygons()[0].points,
            vec![DVec2::new(100.0, 400.0), DVec2::new(900.0, 400.0)]
        );

        grid.clear();
        grid.create_circle(0.0, SphereDim::Longitude, equirect.as_ref(), &vp, 0.0);
        let mut xs: Vec<f64> = grid.polygons().iter().filter_map(|p| p.first()).map(|p| p.x).collect();
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs.len(), 3);
        for (x, expected) in xs.iter().zip([100.0, 500.0, 900.0]) {
            assert!((x - expected).abs() < 1e-9);
        }
        let meridian = &grid.polygons()[0];
        assert!((meridian.points[0].y - 200.0).abs() < 1e-9);
        assert!((meridian.points[1].y - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_rectangular_respects_bounds_and_repeat() {
        let mercator = ProjectionKind::Mercator.build();
        let vp = ViewportParams::new(200.0, DQuat::IDENTITY, 1000, 800);
        let mut grid = GridMap::new();
        grid.create_circle(88f64.to_radians(), SphereDim::Latitude, mercator.as_ref(), &vp, 0.0);
        assert!(grid.polygons().is_empty());

        let mut equirect = ProjectionKind::Equirect.build();
        equirect.set_repeat_x(true);
        grid.create_equator(equirect.as_ref(), &vp);
        assert_eq!(grid.polygons()[0].x_range(), Some((0.0, 1000.0)));

        grid.clear();
        grid.create_circle(0.0, SphereDim::Longitude, equirect.as_ref(), &vp, 0.0);
        // lon 0 at 500, lon 180 at 100 and 900 with an 800 px period
        assert_eq!(grid.polygons().len(), 3);
    }

    #[test]
    fn test_conic_parallels_span_the_sector() {
        let conic = ProjectionKind::Conic.build();
        let vp = ViewportParams::new(100.0, DQuat::IDENTITY, 600, 600);
        let mut grid = GridMap::new();
        grid.create_circle(0.5, SphereDim::Latitude, conic.as_ref(), &vp, 0.0);

        assert_eq!(grid.polygons().len(), 1);
        let parallel = &grid.polygons()[0];
        let west = conic.seam_point(0.5, false, &vp);
        let east = conic.seam_point(0.5, true, &vp);
        assert!(parallel.first().unwrap_or_default().distance(west) < 1e-3);
        assert!(parallel.last().unwrap_or_default().distance(east) < 1e-3);

        grid.clear();
        grid.create_grid(conic.as_ref(), &vp);
        assert!(grid.polygons().len() >= 11 + 24);
    }

    #[test]
    fn test_degenerate_viewport_adds_nothing() {
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::new(0.0, DQuat::IDENTITY, 400, 400);
        let mut grid = GridMap::new();
        grid.create_grid(globe.as_ref(), &vp);
        grid.create_tropics(globe.as_ref(), &vp);
        assert!(grid.polygons().is_empty());
    }
}
