use super::potentials;
use nalgebra::{Point3, Vector3};

/// Flat-bottom harmonic restraint tying every atom to an anchor position.
///
/// Atoms within `radius` of their anchor feel nothing; beyond it the energy
/// is `stiffness·(d - radius)²`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalRestraint {
    anchors: Vec<Point3<f64>>,
    stiffness: f64,
    radius: f64,
}

impl PositionalRestraint {
    pub fn new(anchors: Vec<Point3<f64>>, stiffness: f64, radius: f64) -> Self {
        Self {
            anchors,
            stiffness,
            radius,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn anchors(&self) -> &[Point3<f64>] {
        &self.anchors
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Restraint energy; adds `dE/dx` into `gradient`.
    pub fn energy_and_gradient(
        &self,
        positions: &[Point3<f64>],
        gradient: &mut [Vector3<f64>],
    ) -> f64 {
        let mut energy = 0.0;
        for ((position, anchor), grad) in positions.iter().zip(&self.anchors).zip(gradient) {
            let offset = position - anchor;
            let dist = offset.norm();
            let (e, de) = potentials::flat_bottom_harmonic(dist, self.radius, self.stiffness);
            if e > 0.0 {
                energy += e;
                *grad += offset * (de / dist);
            }
        }
        energy
    }
}
