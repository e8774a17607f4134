use glam::DVec2;

/// Pixels covered by the map, stored as horizontal spans per row.
///
/// A pixel belongs to the region when its center lies inside the outline
/// (even-odd rule). Used to clip drawing and to skip background clearing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapRegion {
    width: usize,
    height: usize,
    /// Half-open `[start, end)` column ranges, one list per row
    rows: Vec<Vec<(usize, usize)>>,
}

impl MapRegion {
    pub fn from_polygon(outline: &[DVec2], width: usize, height: usize) -> Self {
        let mut region = Self {
            width,
            height,
            rows: vec![Vec::new(); height],
        };
        if outline.len() < 3 || width == 0 {
            return region;
        }

        let mut crossings = Vec::new();
        for (y, row) in region.rows.iter_mut().enumerate() {
            let yc = y as f64 + 0.5;
            crossings.clear();
            let mut j = outline.len() - 1;
            for i in 0..outline.len() {
                let (a, b) = (outline[i], outline[j]);
                if (a.y > yc) != (b.y > yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
                j = i;
            }
            crossings.sort_by(f64::total_cmp);

            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil().clamp(0.0, width as f64) as usize;
                let end = (pair[1] - 0.5).ceil().clamp(0.0, width as f64) as usize;
                if start < end {
                    row.push((start, end));
                }
            }
        }
        region
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|spans| spans.iter().any(|&(start, end)| x >= start && x < end))
    }

    /// Spans of one row, empty outside the region
    pub fn spans(&self, y: usize) -> &[(usize, usize)] {
        self.rows.get(y).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of covered pixels
    pub fn area(&self) -> usize {
        self.rows.iter().flatten().map(|&(start, end)| end - start).sum()
    }
}
