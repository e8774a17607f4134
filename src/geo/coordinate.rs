use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::normalize_lon_lat;

/// Mean equatorial radius used to scale altitudes onto the unit sphere.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Angular unit used at the input/output boundary. Internally everything is radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Radian,
    Degree,
}

impl AngleUnit {
    #[inline]
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radian => value,
            AngleUnit::Degree => value.to_radians(),
        }
    }

    #[inline]
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radian => value,
            AngleUnit::Degree => value.to_degrees(),
        }
    }
}

/// A point on (or above) the globe.
///
/// Longitude is kept in (-PI, PI] and latitude in [-PI/2, PI/2]; both in
/// radians. Altitude is meters above the reference sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoCoordinate {
    lon: f64,
    lat: f64,
    altitude: f64,
}

impl GeoCoordinate {
    pub fn new(lon: f64, lat: f64, altitude: f64, unit: AngleUnit) -> Self {
        let (lon, lat) = normalize_lon_lat(unit.to_radians(lon), unit.to_radians(lat));
        Self { lon, lat, altitude }
    }

    pub fn from_radians(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, 0.0, AngleUnit::Radian)
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, 0.0, AngleUnit::Degree)
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    /// Same position at zero altitude.
    pub fn on_ground(self) -> Self {
        self.with_altitude(0.0)
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn lon_in(&self, unit: AngleUnit) -> f64 {
        unit.from_radians(self.lon)
    }

    pub fn lat_in(&self, unit: AngleUnit) -> f64 {
        unit.from_radians(self.lat)
    }

    /// Unit vector in globe space: x towards lon 90°, y towards the north pole,
    /// z towards lon 0° on the equator.
    #[inline]
    pub fn to_unit_vector(&self) -> DVec3 {
        lon_lat_to_vec3(self.lon, self.lat)
    }

    /// Inverse of [`GeoCoordinate::to_unit_vector`]. The vector need not be normalized.
    pub fn from_unit_vector(v: DVec3, altitude: f64) -> Self {
        let v = v.normalize_or_zero();
        let lat = v.y.clamp(-1.0, 1.0).asin();
        let lon = v.x.atan2(v.z);
        Self::new(lon, lat, altitude, AngleUnit::Radian)
    }

    /// Angular distance along the great circle, in radians.
    pub fn angular_distance(&self, other: &GeoCoordinate) -> f64 {
        let a = self.to_unit_vector();
        let b = other.to_unit_vector();
        // atan2 form stays accurate for nearly identical points
        a.cross(b).length().atan2(a.dot(b))
    }
}

/// Convert lon/lat (radians) to a unit sphere vector.
#[inline(always)]
pub(crate) fn lon_lat_to_vec3(lon: f64, lat: f64) -> DVec3 {
    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    DVec3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
}
