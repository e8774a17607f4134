use glam::DVec2;

use crate::map::geometry::{clip_segment, draw_line};
use crate::map::Painter;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
#[derive(Clone, Debug)]
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    pixels: Vec<Vec<u8>>, // Bit patterns per char
    antialiasing: bool,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![vec![0u8; width]; height],
            antialiasing: false,
        }
    }

    #[inline]
    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    #[inline]
    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    pub fn clear(&mut self) {
        for row in &mut self.pixels {
            row.fill(0);
        }
    }

    #[inline]
    fn dot(x: usize, y: usize) -> u8 {
        match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        self.pixels[cy][cx] |= Self::dot(x, y);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y / 4)
            .and_then(|row| row.get(x / 2))
            .is_some_and(|&bits| bits & Self::dot(x, y) != 0)
    }

    /// Get a specific row as a string (for line-by-line rendering)
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.pixels[row]
            .iter()
            .map(|&b| char::from_u32(0x2800 + b as u32).unwrap_or(' '))
            .collect()
    }

    /// Get all rows as an iterator of strings
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }

    #[inline]
    fn to_pixel(&self, v: f64) -> i32 {
        if self.antialiasing {
            v.round() as i32
        } else {
            v.floor() as i32
        }
    }

    fn draw_segment(&mut self, a: DVec2, b: DVec2) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let max = DVec2::new(self.pixel_width() as f64 - 0.5, self.pixel_height() as f64 - 0.5);
        let Some((a, b)) = clip_segment(a, b, DVec2::ZERO, max) else {
            return;
        };
        let (x0, y0) = (self.to_pixel(a.x), self.to_pixel(a.y));
        let (x1, y1) = (self.to_pixel(b.x), self.to_pixel(b.y));
        draw_line(self, x0, y0, x1, y1);
    }
}

impl Painter for BrailleCanvas {
    fn set_antialiasing(&mut self, enabled: bool) {
        self.antialiasing = enabled;
    }

    fn draw_polyline(&mut self, points: &[DVec2]) {
        if let [only] = points {
            self.draw_segment(*only, *only);
            return;
        }
        for pair in points.windows(2) {
            self.draw_segment(pair[0], pair[1]);
        }
    }

    fn draw_polygon(&mut self, points: &[DVec2]) {
        self.draw_polyline(points);
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() > 2 {
                self.draw_segment(last, first);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ScreenPolygon;

    fn render(canvas: &BrailleCanvas) -> String {
        canvas.rows().collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(render(&canvas), "⠁"); // U+2801
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(render(&canvas), "⣿"); // U+28FF (all dots)
    }

    #[test]
    fn test_diagonal() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0, 0);
        canvas.set_pixel(1, 1);
        canvas.set_pixel(2, 2);
        canvas.set_pixel(3, 3);
        // First char: (0,0) and (1,1) = 0x01 | 0x10 = 0x11
        // Second char: (0,2) and (1,3) = 0x04 | 0x80 = 0x84
        assert_eq!(render(&canvas), "⠑⢄");
        assert!(canvas.is_set(3, 3));
        assert!(!canvas.is_set(3, 2));
    }

    #[test]
    fn test_clear() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(1, 5);
        canvas.clear();
        assert!(!canvas.is_set(1, 5));
    }

    #[test]
    fn test_polygon_closes_ring() {
        let mut canvas = BrailleCanvas::new(5, 3);
        let square = ScreenPolygon::closed(vec![
            DVec2::new(1.0, 1.0),
            DVec2::new(8.0, 1.0),
            DVec2::new(8.0, 9.0),
            DVec2::new(1.0, 9.0),
        ]);
        canvas.draw_screen_polygon(&square);
        // closing edge runs back up the left side
        for y in 1..=9 {
            assert!(canvas.is_set(1, y), "missing (1, {y})");
        }

        let mut open = BrailleCanvas::new(5, 3);
        open.draw_screen_polygon(&ScreenPolygon::open(square.points.clone()));
        assert!(!open.is_set(1, 5));
    }

    #[test]
    fn test_polyline_clipped_to_canvas() {
        let mut canvas = BrailleCanvas::new(4, 2);
        canvas.draw_polyline(&[DVec2::new(-1000.0, 3.0), DVec2::new(1000.0, 3.0)]);
        for x in 0..canvas.pixel_width() {
            assert!(canvas.is_set(x, 3));
        }
        assert!(!canvas.is_set(0, 2));
    }

    #[test]
    fn test_antialiasing_rounds() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.draw_polyline(&[DVec2::new(0.7, 0.2)]);
        assert!(canvas.is_set(0, 0));

        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_antialiasing(true);
        canvas.draw_polyline(&[DVec2::new(0.7, 0.2)]);
        assert!(canvas.is_set(1, 0));
    }
}
