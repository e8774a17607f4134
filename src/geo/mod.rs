mod coordinate;
mod lat_lon_alt_box;
mod line_string;

pub use coordinate::{AngleUnit, GeoCoordinate, EARTH_RADIUS_M};
pub(crate) use coordinate::lon_lat_to_vec3;
pub use lat_lon_alt_box::LatLonAltBox;
pub use line_string::{LineString, LinearRing, TessellationFlags};

use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Wrap a longitude in radians into (-PI, PI]
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    if lon > -PI && lon <= PI {
        return lon;
    }
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Normalize a lon/lat pair, reflecting latitudes that run over a pole.
///
/// A latitude of 100° becomes 80° on the opposite meridian, which is where a
/// path that kept going north past the pole actually ends up.
pub fn normalize_lon_lat(lon: f64, lat: f64) -> (f64, f64) {
    let mut lon = lon;
    let mut lat = normalize_lon(lat);

    if lat > FRAC_PI_2 {
        lat = PI - lat;
        lon += PI;
    } else if lat < -FRAC_PI_2 {
        lat = -PI - lat;
        lon += PI;
    }

    (normalize_lon(lon), lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon_range() {
        assert!((normalize_lon(PI) - PI).abs() < 1e-12);
        assert!((normalize_lon(-PI) - PI).abs() < 1e-12);
        assert!((normalize_lon(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_lon(0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_over_pole() {
        let (lon, lat) = normalize_lon_lat(0.0, 100f64.to_radians());
        assert!((lat - 80f64.to_radians()).abs() < 1e-12);
        assert!((lon - PI).abs() < 1e-12);

        let (lon, lat) = normalize_lon_lat(PI / 2.0, -95f64.to_radians());
        assert!((lat + 85f64.to_radians()).abs() < 1e-12);
        assert!((lon + PI / 2.0).abs() < 1e-12);
    }
}
