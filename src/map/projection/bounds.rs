use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use tracing::debug;

use super::{Projection, LAT_LON_ALT_BOX_SAMPLING_RATE};
use crate::geo::{GeoCoordinate, LatLonAltBox};
use crate::map::viewport::{ScreenRect, ViewportParams};

/// Largest great-circle step accepted between neighbouring samples (radians)
const MAX_SAMPLE_STEP: f64 = 0.005;
const MAX_REFINE_DEPTH: u32 = 10;
/// Bisection depth when hunting for the map edge between two samples
const MAX_TRANSITION_DEPTH: u32 = 12;
const LAT_MARGIN: f64 = 0.02;
/// Below this the longitude margin explodes and the full range is used
const MIN_MARGIN_COS: f64 = 0.05;
/// Outline points can land a rounding error off the map
const OUTLINE_NUDGE: f64 = 1e-3;

struct BoxSampler<'a, P: ?Sized> {
    projection: &'a P,
    viewport: &'a ViewportParams,
    rect: ScreenRect,
    bbox: LatLonAltBox,
    full_longitude: bool,
    nudge_toward: Option<DVec2>,
}

impl<P: Projection + ?Sized> BoxSampler<'_, P> {
    fn sample(&self, p: DVec2) -> Option<GeoCoordinate> {
        if !self.rect.contains(p) {
            return None;
        }
        if let Some(c) = self.projection.geo_coordinates(p.x, p.y, self.viewport) {
            return Some(c);
        }
        let target = self.nudge_toward?;
        let dir = (target - p).normalize_or_zero();
        (1..=4).find_map(|k| {
            let q = p + dir * (OUTLINE_NUDGE * k as f64);
            self.projection.geo_coordinates(q.x, q.y, self.viewport)
        })
    }

    fn record(&mut self, c: Option<GeoCoordinate>) {
        if let Some(c) = c {
            self.bbox.extend(&c);
        }
    }

    /// Sample a straight screen path every few pixels, refining in between.
    fn add_path(&mut self, from: DVec2, to: DVec2) {
        let steps = ((to - from).length() / LAT_LON_ALT_BOX_SAMPLING_RATE).ceil().max(1.0) as usize;
        let mut prev_point = from;
        let mut prev = self.sample(from);
        self.record(prev);

        for i in 1..=steps {
            let point = from.lerp(to, i as f64 / steps as f64);
            let current = self.sample(point);
            self.record(current);
            self.refine(prev_point, prev, point, current, 0);
            prev_point = point;
            prev = current;
        }
    }

    fn refine(&mut self, pa: DVec2, a: Option<GeoCoordinate>, pb: DVec2, b: Option<GeoCoordinate>, depth: u32) {
        match (a, b) {
            (Some(ga), Some(gb)) => {
                if (ga.lon() - gb.lon()).abs() > PI {
                    self.full_longitude = true;
                }
                if depth >= MAX_REFINE_DEPTH || ga.angular_distance(&gb) <= MAX_SAMPLE_STEP {
                    return;
                }
            }
            (None, None) => return,
            _ => {
                if depth >= MAX_TRANSITION_DEPTH {
                    return;
                }
            }
        }

        let pm = (pa + pb) / 2.0;
        let m = self.sample(pm);
        self.record(m);
        self.refine(pa, a, pm, m, depth + 1);
        self.refine(pm, m, pb, b, depth + 1);
    }
}

/// Box over the on-map pixels of `rect`: the rectangle edges and the parts
/// of the map outline inside it bound the covered region, except at a pole.
pub(super) fn sample_lat_lon_alt_box<P: Projection + ?Sized>(
    projection: &P,
    rect: &ScreenRect,
    viewport: &ViewportParams,
) -> LatLonAltBox {
    if viewport.is_degenerate() || rect.is_empty() {
        return LatLonAltBox::empty();
    }

    let mut sampler = BoxSampler {
        projection,
        viewport,
        rect: *rect,
        bbox: LatLonAltBox::empty(),
        full_longitude: false,
        nudge_toward: None,
    };

    let corners = rect.corners();
    for i in 0..corners.len() {
        sampler.add_path(corners[i], corners[(i + 1) % corners.len()]);
    }

    let shape = projection.map_shape(viewport);
    if shape.len() >= 2 {
        sampler.nudge_toward = Some(shape.iter().copied().sum::<DVec2>() / shape.len() as f64);
        for i in 0..shape.len() {
            sampler.add_path(shape[i], shape[(i + 1) % shape.len()]);
        }
    }

    let mut bbox = sampler.bbox;
    if bbox.is_empty() {
        debug!(?rect, "no map pixels in rectangle");
        return bbox;
    }

    for pole in [FRAC_PI_2, -FRAC_PI_2] {
        let projected = projection.screen_coordinates(0.0, pole, viewport);
        if projected.on_map && rect.contains(projected.position) {
            if pole > 0.0 {
                bbox.north = FRAC_PI_2;
            } else {
                bbox.south = -FRAC_PI_2;
            }
            if projection.traversable_poles() {
                sampler.full_longitude = true;
            }
        }
    }

    if sampler.full_longitude {
        bbox.set_full_longitude();
    }

    let extreme = bbox.north.abs().max(bbox.south.abs());
    let cos = (extreme + LAT_MARGIN).min(FRAC_PI_2).cos();
    if cos < MIN_MARGIN_COS {
        bbox.set_full_longitude();
        bbox.pad(0.0, LAT_MARGIN);
    } else {
        bbox.pad(LAT_MARGIN / cos, LAT_MARGIN);
    }

    debug!(
        west = bbox.west,
        east = bbox.east,
        south = bbox.south,
        north = bbox.north,
        "sampled lat/lon box"
    );
    bbox
}
