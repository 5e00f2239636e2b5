//! State vector to Cartesian coordinates.
//!
//! The state is `[t_x, t_y, t_z, p_x, p_y, p_z, τ_0, …, τ_{R-1}]`: a rigid
//! translation, an exponential-map rotation about the centroid of the original
//! coordinates, and one target torsion per rotatable bond.

use crate::core::math::rotation::Rotation3;
use crate::core::topology::rotatable::RotatableBond;
use crate::core::utils::geometry::{centroid, normalize_angle};
use nalgebra::{Matrix3, Point3, Vector3};

pub const RIGID_DOF: usize = 6;

/// Working conformer of the fit molecule, owned separately from the
/// immutable snapshot it is rebuilt from.
#[derive(Debug, Clone)]
pub struct FlexiblePose<'a> {
    original: Vec<Point3<f64>>,
    working: Vec<Point3<f64>>,
    pre_rigid: Vec<Point3<f64>>,
    centroid: Point3<f64>,
    bonds: &'a [RotatableBond],
    rotation: Rotation3,
}

impl<'a> FlexiblePose<'a> {
    pub fn new(snapshot: Vec<Point3<f64>>, bonds: &'a [RotatableBond]) -> Self {
        let centroid = centroid(&snapshot);
        Self {
            working: snapshot.clone(),
            pre_rigid: snapshot.clone(),
            original: snapshot,
            centroid,
            bonds,
            rotation: Rotation3::identity(),
        }
    }

    pub fn dimension(&self) -> usize {
        RIGID_DOF + self.bonds.len()
    }

    /// State that reproduces the snapshot: no rigid motion and every target
    /// torsion equal to its measured value.
    pub fn identity_state(&self) -> Vec<f64> {
        let mut state = vec![0.0; RIGID_DOF];
        state.extend(self.bonds.iter().map(|bond| bond.torsion(&self.original)));
        state
    }

    pub fn coordinates(&self) -> &[Point3<f64>] {
        &self.working
    }

    /// Rebuilds the working coordinates from the snapshot.
    ///
    /// Torsions are applied in bond-table order, each measured after the
    /// previous ones, and the rigid transform is applied last. Calling this
    /// twice with the same state gives bit-identical coordinates.
    pub fn update_coordinates(&mut self, state: &[f64]) {
        debug_assert_eq!(state.len(), self.dimension());
        self.pre_rigid.copy_from_slice(&self.original);

        for (bond, &target) in self.bonds.iter().zip(&state[RIGID_DOF..]) {
            let delta = normalize_angle(target - bond.torsion(&self.pre_rigid));
            if delta != 0.0 {
                bond.rotate(&mut self.pre_rigid, delta);
            }
        }

        self.rotation = Rotation3::from_exp_map(Vector3::new(state[3], state[4], state[5]));
        let translation = Vector3::new(state[0], state[1], state[2]);
        let displacement = self.rotation.matrix() - Matrix3::identity();
        for (out, pre) in self.working.iter_mut().zip(&self.pre_rigid) {
            *out = pre + displacement * (pre - self.centroid) + translation;
        }
    }

    /// Chain rule from per-atom Cartesian gradients into the state gradient.
    pub fn backpropagate(&self, cartesian: &[Vector3<f64>], gradient: &mut [f64]) {
        gradient.fill(0.0);

        let translation: Vector3<f64> = cartesian.iter().sum();
        gradient[..3].copy_from_slice(translation.as_slice());

        let derivatives = self.rotation.derivatives();
        for (pre, grad) in self.pre_rigid.iter().zip(cartesian) {
            let arm = pre - self.centroid;
            for (i, derivative) in derivatives.iter().enumerate() {
                gradient[3 + i] += (derivative * arm).dot(grad);
            }
        }

        for (b, bond) in self.bonds.iter().enumerate() {
            let origin = self.working[bond.center()];
            let axis = bond.axis(&self.working);
            gradient[RIGID_DOF + b] = bond
                .moving
                .iter()
                .map(|&atom| axis.cross(&(self.working[atom] - origin)).dot(&cartesian[atom]))
                .sum();
        }
    }
}
