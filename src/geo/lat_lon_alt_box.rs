use std::f64::consts::{FRAC_PI_2, PI};

use super::GeoCoordinate;

/// Axis-aligned box in geographic space (radians, meters).
///
/// `west <= east` always holds for a non-empty box; geography that wraps the
/// date line is represented by the full longitude range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLonAltBox {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
}

impl LatLonAltBox {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
            min_altitude: 0.0,
            max_altitude: 0.0,
        }
    }

    /// A box containing nothing; extending it with a point yields that point.
    pub fn empty() -> Self {
        Self {
            west: f64::INFINITY,
            east: f64::NEG_INFINITY,
            south: f64::INFINITY,
            north: f64::NEG_INFINITY,
            min_altitude: f64::INFINITY,
            max_altitude: f64::NEG_INFINITY,
        }
    }

    pub fn world() -> Self {
        Self::new(-PI, PI, -FRAC_PI_2, FRAC_PI_2)
    }

    pub fn is_empty(&self) -> bool {
        !(self.west <= self.east && self.south <= self.north)
    }

    pub fn extend(&mut self, c: &GeoCoordinate) {
        self.west = self.west.min(c.lon());
        self.east = self.east.max(c.lon());
        self.south = self.south.min(c.lat());
        self.north = self.north.max(c.lat());
        self.min_altitude = self.min_altitude.min(c.altitude());
        self.max_altitude = self.max_altitude.max(c.altitude());
    }

    pub fn contains(&self, c: &GeoCoordinate) -> bool {
        self.contains_lon_lat(c.lon(), c.lat())
    }

    pub fn contains_lon_lat(&self, lon: f64, lat: f64) -> bool {
        !self.is_empty()
            && lon >= self.west
            && lon <= self.east
            && lat >= self.south
            && lat <= self.north
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.east - self.west
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.north - self.south
        }
    }

    pub fn covers_all_longitudes(&self) -> bool {
        !self.is_empty() && self.west <= -PI && self.east >= PI
    }

    pub fn set_full_longitude(&mut self) {
        self.west = -PI;
        self.east = PI;
    }

    /// Grow by the given margins, staying inside the valid lon/lat ranges.
    pub fn pad(&mut self, lon_margin: f64, lat_margin: f64) {
        if self.is_empty() {
            return;
        }
        self.west = (self.west - lon_margin).max(-PI);
        self.east = (self.east + lon_margin).min(PI);
        self.south = (self.south - lat_margin).max(-FRAC_PI_2);
        self.north = (self.north + lat_margin).min(FRAC_PI_2);
    }

    /// (min_lon, min_lat, max_lon, max_lat) in degrees
    pub fn to_degrees(&self) -> (f64, f64, f64, f64) {
        (
            self.west.to_degrees(),
            self.south.to_degrees(),
            self.east.to_degrees(),
            self.north.to_degrees(),
        )
    }
}

impl Default for LatLonAltBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_extend() {
        let mut bbox = LatLonAltBox::empty();
        assert!(bbox.is_empty());
        bbox.extend(&GeoCoordinate::from_degrees(10.0, 20.0).with_altitude(50.0));
        assert!(!bbox.is_empty());
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.min_altitude, 50.0);
        assert!(bbox.contains(&GeoCoordinate::from_degrees(10.0, 20.0)));
    }

    #[test]
    fn test_pad_clamps() {
        let mut bbox = LatLonAltBox::new(-3.0, 3.0, -1.5, 1.5);
        bbox.pad(1.0, 1.0);
        assert_eq!(bbox.west, -PI);
        assert_eq!(bbox.east, PI);
        assert_eq!(bbox.north, FRAC_PI_2);
        assert!(bbox.covers_all_longitudes());
    }

    #[test]
    fn test_empty_contains_nothing() {
        let bbox = LatLonAltBox::empty();
        assert!(!bbox.contains_lon_lat(0.0, 0.0));
        assert_eq!(bbox.height(), 0.0);
    }
}
