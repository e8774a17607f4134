use glam::DVec3;

use super::{GeoCoordinate, LatLonAltBox};

/// Options that control how a segment is interpolated between its end nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TessellationFlags {
    /// Interpolate along the great circle instead of linearly in lon/lat
    pub follow_great_circle: bool,
    /// Add the end nodes dropped to zero altitude
    pub clamp_to_ground: bool,
}

impl TessellationFlags {
    /// Linear interpolation in lon/lat, e.g. for parallels.
    pub const NONE: Self = Self {
        follow_great_circle: false,
        clamp_to_ground: false,
    };

    pub const GREAT_CIRCLE: Self = Self {
        follow_great_circle: true,
        clamp_to_ground: false,
    };

    pub const fn with_clamp_to_ground(mut self) -> Self {
        self.clamp_to_ground = true;
        self
    }

    pub const fn without_clamp_to_ground(mut self) -> Self {
        self.clamp_to_ground = false;
        self
    }
}

impl Default for TessellationFlags {
    fn default() -> Self {
        Self::GREAT_CIRCLE
    }
}

/// Ordered sequence of coordinates, owned by the data layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString {
    coordinates: Vec<GeoCoordinate>,
    flags: TessellationFlags,
}

impl LineString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: TessellationFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Build from (lon, lat) pairs in degrees, the order GeoJSON uses.
    pub fn from_degrees(points: &[(f64, f64)]) -> Self {
        points
            .iter()
            .map(|&(lon, lat)| GeoCoordinate::from_degrees(lon, lat))
            .collect()
    }

    pub fn push(&mut self, coordinate: GeoCoordinate) {
        self.coordinates.push(coordinate);
    }

    #[inline]
    pub fn coordinates(&self) -> &[GeoCoordinate] {
        &self.coordinates
    }

    #[inline]
    pub fn flags(&self) -> TessellationFlags {
        self.flags
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Consecutive node pairs
    pub fn segments(&self) -> impl Iterator<Item = (&GeoCoordinate, &GeoCoordinate)> + '_ {
        self.coordinates.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Min/max box over the nodes, used for coarse spatial indexing.
    /// Great-circle segments also reach the latitude of any arc vertex
    /// between their end points.
    pub fn lat_lon_alt_box(&self) -> LatLonAltBox {
        segments_box(&self.coordinates, self.segments(), self.flags)
    }
}

impl FromIterator<GeoCoordinate> for LineString {
    fn from_iter<I: IntoIterator<Item = GeoCoordinate>>(iter: I) -> Self {
        Self {
            coordinates: iter.into_iter().collect(),
            flags: TessellationFlags::default(),
        }
    }
}

/// A line string whose last node implicitly connects back to the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearRing(LineString);

impl LinearRing {
    pub fn new(line: LineString) -> Self {
        let mut line = line;
        // GeoJSON rings repeat the first node at the end; the closing segment is implicit here
        if line.coordinates.len() > 1 && line.coordinates.first() == line.coordinates.last() {
            line.coordinates.pop();
        }
        Self(line)
    }

    pub fn from_degrees(points: &[(f64, f64)]) -> Self {
        Self::new(LineString::from_degrees(points))
    }

    #[inline]
    pub fn coordinates(&self) -> &[GeoCoordinate] {
        self.0.coordinates()
    }

    pub fn flags(&self) -> TessellationFlags {
        self.0.flags()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node pairs including the closing segment
    pub fn segments(&self) -> impl Iterator<Item = (&GeoCoordinate, &GeoCoordinate)> + '_ {
        let coords = self.0.coordinates();
        let n = coords.len();
        let count = if n > 1 { n } else { 0 };
        (0..count).map(move |i| (&coords[i], &coords[(i + 1) % n]))
    }

    pub fn lat_lon_alt_box(&self) -> LatLonAltBox {
        segments_box(self.0.coordinates(), self.segments(), self.0.flags())
    }
}

fn segments_box<'a>(
    coordinates: &[GeoCoordinate],
    segments: impl Iterator<Item = (&'a GeoCoordinate, &'a GeoCoordinate)>,
    flags: TessellationFlags,
) -> LatLonAltBox {
    let mut bbox = LatLonAltBox::empty();
    for c in coordinates {
        bbox.extend(c);
    }
    if flags.follow_great_circle && !bbox.is_empty() {
        for (a, b) in segments {
            let (south, north) = arc_latitude_range(a, b);
            bbox.south = bbox.south.min(south);
            bbox.north = bbox.north.max(north);
        }
    }
    bbox
}

/// Latitude range covered by the minor great-circle arc a→b, which can
/// extend past both end points toward a pole.
pub(crate) fn arc_latitude_range(a: &GeoCoordinate, b: &GeoCoordinate) -> (f64, f64) {
    let (mut south, mut north) = (a.lat().min(b.lat()), a.lat().max(b.lat()));
    let (va, vb) = (a.to_unit_vector(), b.to_unit_vector());
    let normal = va.cross(vb);
    if normal.length_squared() < 1e-24 {
        return (south, north);
    }
    let normal = normal.normalize();
    // northernmost point of the full circle
    let top = (DVec3::Y - normal * normal.y).normalize_or_zero();
    if top == DVec3::ZERO {
        return (south, north);
    }
    for vertex in [top, -top] {
        let on_arc = va.cross(vertex).dot(normal) >= 0.0 && vertex.cross(vb).dot(normal) >= 0.0;
        if on_arc {
            let lat = vertex.y.clamp(-1.0, 1.0).asin();
            south = south.min(lat);
            north = north.max(lat);
        }
    }
    (south, north)
}
