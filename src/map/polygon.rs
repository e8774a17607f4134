use glam::DVec2;

/// One contiguous run of screen points produced from geographic geometry.
///
/// A closed polygon implicitly connects its last point back to the first; the
/// first point is not repeated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenPolygon {
    pub points: Vec<DVec2>,
    pub closed: bool,
}

impl ScreenPolygon {
    pub fn open(points: Vec<DVec2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<DVec2>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    /// Horizontal extent as (min_x, max_x)
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.x, p.x)),
            Some((lo, hi)) => Some((lo.min(p.x), hi.max(p.x))),
        })
    }

    /// Copy shifted horizontally, used for repeated cylindrical maps
    pub fn translated_x(&self, dx: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| DVec2::new(p.x + dx, p.y)).collect(),
            closed: self.closed,
        }
    }
}
