use super::{Cylindrical, LatitudeScale, PreservationType, ProjectionKind};

/// atan(sinh(π)), about 85.0511°: the latitude where the map becomes square
pub const MERCATOR_MAX_LAT: f64 = 1.484_422_229_745_332_4;

/// Conformal cylindrical scale, diverging at the poles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mercator;

impl LatitudeScale for Mercator {
    const KIND: ProjectionKind = ProjectionKind::Mercator;
    const PRESERVATION: PreservationType = PreservationType::Conformal;
    const MAX_LAT: f64 = MERCATOR_MAX_LAT;

    #[inline]
    fn forward(lat: f64) -> f64 {
        lat.tan().asinh()
    }

    #[inline]
    fn inverse(y: f64) -> f64 {
        y.sinh().atan()
    }
}

pub type MercatorProjection = Cylindrical<Mercator>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_max_lat_maps_to_pi() {
        assert!((Mercator::forward(MERCATOR_MAX_LAT) - PI).abs() < 1e-9);
        assert!((Mercator::inverse(PI) - MERCATOR_MAX_LAT).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_round_trip() {
        for deg in [-80.0f64, -45.0, 0.0, 12.5, 60.0, 85.0] {
            let lat = deg.to_radians();
            assert!((Mercator::inverse(Mercator::forward(lat)) - lat).abs() < 1e-12);
        }
    }
}
