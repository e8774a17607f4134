//! Adaptive subdivision of geographic segments into screen polygons.

use glam::DVec2;
use tracing::trace;

use crate::geo::{normalize_lon, GeoCoordinate, TessellationFlags};
use crate::map::projection::{map_width, Projected, Projection};
use crate::map::viewport::ViewportParams;
use crate::map::ScreenPolygon;

/// Largest Manhattan distance in pixels between consecutive nodes.
pub const TESSELLATION_PRECISION: f64 = 10.0;
/// Subdivision cap per segment, at most 2^depth + 1 nodes.
pub const MAX_TESSELLATION_DEPTH: u32 = 8;

/// A geographic node together with where it lands on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub coordinate: GeoCoordinate,
    pub projected: Projected,
}

impl Node {
    pub fn new<P: Projection + ?Sized>(projection: &P, coordinate: GeoCoordinate, viewport: &ViewportParams) -> Self {
        Self {
            coordinate,
            projected: projection.project(&coordinate, viewport),
        }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.projected.position
    }
}

#[inline(always)]
fn manhattan(a: DVec2, b: DVec2) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Halfway point of a segment, on the great circle or linear in lon/lat.
fn midpoint(a: &GeoCoordinate, b: &GeoCoordinate, flags: TessellationFlags) -> GeoCoordinate {
    let altitude = (a.altitude() + b.altitude()) / 2.0;
    if flags.follow_great_circle {
        let sum = a.to_unit_vector() + b.to_unit_vector();
        // antipodal end points have no unique great circle
        if sum.length_squared() > 1e-20 {
            return GeoCoordinate::from_unit_vector(sum, altitude);
        }
    }
    let lon = a.lon() + normalize_lon(b.lon() - a.lon()) / 2.0;
    let lat = (a.lat() + b.lat()) / 2.0;
    GeoCoordinate::from_radians(normalize_lon(lon), lat).with_altitude(altitude)
}

/// Nodes from `a` to `b` inclusive, no two consecutive ones more than
/// [`TESSELLATION_PRECISION`] apart unless the depth cap stops subdivision.
///
/// With `clamp_to_ground` the end points dropped to zero altitude are added
/// before `a` and after `b`.
pub fn tessellate_line_segment<P: Projection + ?Sized>(
    projection: &P,
    a: &Node,
    b: &Node,
    viewport: &ViewportParams,
    flags: TessellationFlags,
) -> Vec<Node> {
    let mut nodes = Vec::new();
    if flags.clamp_to_ground {
        nodes.push(Node::new(projection, a.coordinate.on_ground(), viewport));
    }
    nodes.push(*a);
    subdivide(projection, a, b, viewport, flags, 0, &mut nodes);
    if flags.clamp_to_ground {
        nodes.push(Node::new(projection, b.coordinate.on_ground(), viewport));
    }
    nodes
}

fn subdivide<P: Projection + ?Sized>(
    projection: &P,
    a: &Node,
    b: &Node,
    viewport: &ViewportParams,
    flags: TessellationFlags,
    depth: u32,
    out: &mut Vec<Node>,
) {
    if manhattan(a.position(), b.position()) <= TESSELLATION_PRECISION {
        out.push(*b);
        return;
    }
    if depth >= MAX_TESSELLATION_DEPTH {
        trace!(from = ?a.position(), to = ?b.position(), "tessellation depth cap reached");
        out.push(*b);
        return;
    }
    let mid = Node::new(projection, midpoint(&a.coordinate, &b.coordinate, flags), viewport);
    subdivide(projection, a, &mid, viewport, flags, depth + 1, out);
    subdivide(projection, &mid, b, viewport, flags, depth + 1, out);
}

#[derive(Debug)]
struct Run {
    points: Vec<DVec2>,
    starts_on_horizon: bool,
    ends_on_horizon: bool,
}

/// Folds a stream of nodes into screen polygons, cutting wherever the path
/// leaves the map.
pub struct PolygonBuilder<'a, P: ?Sized> {
    projection: &'a P,
    viewport: &'a ViewportParams,
    runs: Vec<Run>,
    current: Vec<DVec2>,
    current_starts_on_horizon: bool,
    previous: Option<Node>,
    started_on_map: Option<bool>,
    ended_on_map: bool,
    broken: bool,
}

impl<'a, P: Projection + ?Sized> PolygonBuilder<'a, P> {
    pub fn new(projection: &'a P, viewport: &'a ViewportParams) -> Self {
        Self {
            projection,
            viewport,
            runs: Vec::new(),
            current: Vec::new(),
            current_starts_on_horizon: false,
            previous: None,
            started_on_map: None,
            ended_on_map: false,
            broken: false,
        }
    }

    pub fn push(&mut self, node: Node) {
        if self.started_on_map.is_none() {
            self.started_on_map = Some(node.projected.on_map);
        }

        match self.previous {
            None => {
                if node.projected.on_map {
                    self.current.push(node.position());
                }
            }
            Some(prev) => match (prev.projected.on_map, node.projected.on_map) {
                (true, true) => self.current.push(node.position()),
                (true, false) => {
                    let horizon = if node.projected.globe_hides_point {
                        self.projection
                            .horizon_crossing(&prev.coordinate, &node.coordinate, self.viewport)
                    } else {
                        None
                    };
                    if let Some(h) = horizon {
                        self.current.push(h);
                    }
                    self.flush(horizon.is_some());
                    self.broken = true;
                }
                (false, true) => {
                    let horizon = if prev.projected.globe_hides_point {
                        self.projection
                            .horizon_crossing(&prev.coordinate, &node.coordinate, self.viewport)
                    } else {
                        None
                    };
                    self.current_starts_on_horizon = horizon.is_some();
                    self.current.extend(horizon);
                    self.current.push(node.position());
                    self.broken = true;
                }
                (false, false) => {}
            },
        }

        self.previous = Some(node);
        self.ended_on_map = node.projected.on_map;
    }

    /// Tessellate `a → b` and push everything after `a`, which is already in.
    pub fn push_segment(&mut self, a: &Node, b: &Node, flags: TessellationFlags) {
        for node in tessellate_line_segment(self.projection, a, b, self.viewport, flags)
            .into_iter()
            .skip(1)
        {
            self.push(node);
        }
    }

    /// Cut the path without a visibility change, e.g. at the map seam.
    pub fn break_path(&mut self) {
        self.flush(false);
        self.previous = None;
        self.broken = true;
    }

    fn flush(&mut self, ends_on_horizon: bool) {
        if !self.current.is_empty() {
            self.runs.push(Run {
                points: std::mem::take(&mut self.current),
                starts_on_horizon: self.current_starts_on_horizon,
                ends_on_horizon,
            });
        }
        self.current_starts_on_horizon = false;
    }

    /// Emit the polygons. A `closed` path was fed with its first node repeated
    /// at the end.
    pub fn finish(mut self, closed: bool) -> Vec<ScreenPolygon> {
        self.flush(false);
        let mut runs = std::mem::take(&mut self.runs);

        if !closed {
            return runs
                .into_iter()
                .filter(|run| run.points.len() >= 2)
                .map(|run| ScreenPolygon::open(run.points))
                .collect();
        }

        if !self.broken {
            let Some(mut run) = runs.pop() else {
                return Vec::new();
            };
            if run.points.len() > 1 {
                run.points.pop();
            }
            if run.points.len() < 3 {
                return Vec::new();
            }
            return vec![ScreenPolygon::closed(run.points)];
        }

        // the last run carries on into the first through the start node
        if self.started_on_map == Some(true) && self.ended_on_map && runs.len() >= 2 {
            let first = runs.remove(0);
            if let Some(last) = runs.last_mut() {
                last.points.extend(first.points.into_iter().skip(1));
                last.ends_on_horizon = first.ends_on_horizon;
            }
        }

        let stitchable = !runs.is_empty() && runs.iter().all(|run| run.starts_on_horizon && run.ends_on_horizon);
        if stitchable {
            let mut points = Vec::new();
            for (i, run) in runs.iter().enumerate() {
                points.extend_from_slice(&run.points);
                let next = &runs[(i + 1) % runs.len()];
                if let (Some(&disappear), Some(&reappear)) = (run.points.last(), next.points.first()) {
                    points.extend(self.projection.horizon_to_polygon(self.viewport, disappear, reappear));
                }
            }
            if points.len() >= 3 {
                return vec![ScreenPolygon::closed(points)];
            }
            return Vec::new();
        }

        runs.into_iter()
            .filter(|run| run.points.len() >= 2)
            .map(|run| ScreenPolygon::open(run.points))
            .collect()
    }
}

/// Project a path (or ring when `closed`) into screen polygons.
///
/// Segments are tessellated, cut at visibility changes and at the seam of
/// flat maps. Repeating maps get a copy per map width touching the viewport.
pub fn build_polygons<P: Projection + ?Sized>(
    projection: &P,
    coordinates: &[GeoCoordinate],
    closed: bool,
    flags: TessellationFlags,
    viewport: &ViewportParams,
) -> Vec<ScreenPolygon> {
    if viewport.is_degenerate() || coordinates.is_empty() {
        return Vec::new();
    }

    let nodes: Vec<Node> = coordinates
        .iter()
        .map(|&c| Node::new(projection, c, viewport))
        .collect();
    let segment_flags = flags.without_clamp_to_ground();
    let clamp = flags.clamp_to_ground && !closed;

    let mut builder = PolygonBuilder::new(projection, viewport);

    if clamp {
        builder.push(Node::new(projection, nodes[0].coordinate.on_ground(), viewport));
    }
    builder.push(nodes[0]);

    let segments = if closed { nodes.len() } else { nodes.len() - 1 };
    for i in 0..segments {
        let a = &nodes[i];
        let b = &nodes[(i + 1) % nodes.len()];
        match projection.seam_crossing(&a.coordinate, &b.coordinate, segment_flags, viewport) {
            Some(crossing) => {
                let on_map = projection.project(&crossing.coordinate, viewport).on_map;
                let at = |position| Node {
                    coordinate: crossing.coordinate,
                    projected: Projected::new(position, on_map, false, viewport),
                };
                let (exit, entry) = (at(crossing.exit), at(crossing.entry));
                builder.push_segment(a, &exit, segment_flags);
                builder.break_path();
                builder.push(entry);
                builder.push_segment(&entry, b, segment_flags);
            }
            None => builder.push_segment(a, b, segment_flags),
        }
    }

    if clamp {
        if let Some(last) = nodes.last() {
            builder.push(Node::new(projection, last.coordinate.on_ground(), viewport));
        }
    }

    let polygons = builder.finish(closed);
    if projection.repeat_x() {
        repeat_polygons(polygons, viewport)
    } else {
        polygons
    }
}

/// Copies of each polygon at every map width offset that reaches the viewport.
fn repeat_polygons(polygons: Vec<ScreenPolygon>, viewport: &ViewportParams) -> Vec<ScreenPolygon> {
    let period = map_width(viewport);
    let width = viewport.width() as f64;
    let mut repeated = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        let Some((min_x, max_x)) = polygon.x_range() else {
            continue;
        };
        let first = ((-max_x) / period).ceil().min(0.0) as i64;
        let last = ((width - min_x) / period).floor().max(0.0) as i64;
        for k in (first..=last).filter(|&k| k != 0) {
            repeated.push(polygon.translated_x(k as f64 * period));
        }
        repeated.push(polygon);
    }
    repeated
}
