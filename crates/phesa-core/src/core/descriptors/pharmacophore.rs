use super::gaussian::{GAUSSIAN_HEIGHT, Gaussian, alpha_for_radius};
use crate::core::models::atom::PharmacophoreType;
use nalgebra::Point3;

/// Radius of every pharmacophore Gaussian, in Angstroms.
pub const PHARMACOPHORE_RADIUS: f64 = 1.0;

/// Relative weight of a feature type in the pharmacophore overlap.
pub fn feature_weight(feature: PharmacophoreType) -> f64 {
    match feature {
        PharmacophoreType::Acceptor
        | PharmacophoreType::Donor
        | PharmacophoreType::PositiveCharge
        | PharmacophoreType::NegativeCharge => 1.0,
        PharmacophoreType::AromaticRing => 0.8,
    }
}

/// Interaction similarity of two feature types, symmetric and in `[0, 1]`.
///
/// Identical types match fully; an acceptor partially matches a negative
/// charge and a donor partially matches a positive charge.
pub fn similarity(a: PharmacophoreType, b: PharmacophoreType) -> f64 {
    use PharmacophoreType::*;
    match (a, b) {
        _ if a == b => 1.0,
        (Acceptor, NegativeCharge) | (NegativeCharge, Acceptor) => 0.5,
        (Donor, PositiveCharge) | (PositiveCharge, Donor) => 0.5,
        _ => 0.0,
    }
}

/// Pharmacophore Gaussian located on the atom carrying the feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PPGaussian {
    pub atom: usize,
    pub feature: PharmacophoreType,
    pub center: Point3<f64>,
    pub alpha: f64,
    pub height: f64,
    pub weight: f64,
}

impl PPGaussian {
    pub fn new(atom: usize, feature: PharmacophoreType, center: Point3<f64>) -> Self {
        Self {
            atom,
            feature,
            center,
            alpha: alpha_for_radius(PHARMACOPHORE_RADIUS),
            height: GAUSSIAN_HEIGHT,
            weight: feature_weight(feature),
        }
    }

    /// Factor applied to the raw Gaussian overlap of this pair.
    #[inline]
    pub fn interaction(&self, other: &Self) -> f64 {
        similarity(self.feature, other.feature) * self.weight * other.weight
    }
}

impl Gaussian for PPGaussian {
    fn atom(&self) -> usize {
        self.atom
    }
    fn center(&self) -> Point3<f64> {
        self.center
    }
    fn alpha(&self) -> f64 {
        self.alpha
    }
    fn height(&self) -> f64 {
        self.height
    }
    fn center_in(&self, positions: &[Point3<f64>]) -> Point3<f64> {
        positions[self.atom]
    }
    fn set_center(&mut self, center: Point3<f64>) {
        self.center = center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::gaussian::KAPPA;
    use crate::core::models::atom::PharmacophoreType::*;

    const ALL: [PharmacophoreType; 5] =
        [Acceptor, Donor, PositiveCharge, NegativeCharge, AromaticRing];

    #[test]
    fn similarity_is_symmetric_with_full_self_match() {
        for a in ALL {
            assert_eq!(similarity(a, a), 1.0);
            for b in ALL {
                assert_eq!(similarity(a, b), similarity(b, a));
            }
        }
    }

    #[test]
    fn similarity_partially_matches_charged_counterparts() {
        assert_eq!(similarity(Acceptor, NegativeCharge), 0.5);
        assert_eq!(similarity(PositiveCharge, Donor), 0.5);
        assert_eq!(similarity(Acceptor, Donor), 0.0);
        assert_eq!(similarity(AromaticRing, PositiveCharge), 0.0);
    }

    #[test]
    fn interaction_combines_similarity_and_weights() {
        let acceptor = PPGaussian::new(0, Acceptor, Point3::origin());
        let ring = PPGaussian::new(1, AromaticRing, Point3::origin());
        let negative = PPGaussian::new(2, NegativeCharge, Point3::origin());
        assert_eq!(acceptor.interaction(&negative), 0.5);
        assert!((ring.interaction(&ring) - 0.64).abs() < 1e-12);
        assert_eq!(acceptor.interaction(&ring), 0.0);
    }

    #[test]
    fn pharmacophore_gaussian_uses_unit_radius() {
        let gaussian = PPGaussian::new(3, Donor, Point3::new(1.0, 2.0, 3.0));
        assert!((gaussian.alpha - KAPPA).abs() < 1e-12);
        assert_eq!(gaussian.atom(), 3);
    }
}
