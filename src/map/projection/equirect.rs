use std::f64::consts::FRAC_PI_2;

use super::{Cylindrical, LatitudeScale, PreservationType, ProjectionKind};

/// Plate carrée: latitude maps linearly to y.
#[derive(Clone, Copy, Debug, Default)]
pub struct Equirect;

impl LatitudeScale for Equirect {
    const KIND: ProjectionKind = ProjectionKind::Equirect;
    const PRESERVATION: PreservationType = PreservationType::NoPreservation;
    const MAX_LAT: f64 = FRAC_PI_2;

    #[inline]
    fn forward(lat: f64) -> f64 {
        lat
    }

    #[inline]
    fn inverse(y: f64) -> f64 {
        y
    }
}

pub type EquirectProjection = Cylindrical<Equirect>;
