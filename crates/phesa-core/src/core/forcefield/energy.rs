use super::potentials;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForceFieldError {
    #[error("Missing force field parameters for element '{element}' of atom {atom}")]
    MissingParameters { atom: usize, element: String },
    #[error("Atom count mismatch: force field expects {expected} atoms, got {found}")]
    AtomCountMismatch { expected: usize, found: usize },
}

/// Potential energy and Cartesian gradient of one molecule.
pub trait ForceField {
    fn atom_count(&self) -> usize;

    /// Energy at `positions`; overwrites `gradient` with `dE/dx` per atom.
    fn energy_and_gradient(&self, positions: &[Point3<f64>], gradient: &mut [Vector3<f64>])
    -> f64;

    fn energy(&self, positions: &[Point3<f64>]) -> f64 {
        let mut gradient = vec![Vector3::zeros(); positions.len()];
        self.energy_and_gradient(positions, &mut gradient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerm {
    pub atoms: [usize; 2],
    pub length: f64,
    pub stiffness: f64,
}

/// Angle `atoms[0]-atoms[1]-atoms[2]` around the central atom `atoms[1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTerm {
    pub atoms: [usize; 3],
    pub cos_ideal: f64,
    pub stiffness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdwTerm {
    pub atoms: [usize; 2],
    pub r_min: f64,
    pub well_depth: f64,
}

/// Harmonic bonds, cosine-harmonic angles, and 12-6 van der Waals pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolecularForceField {
    pub(crate) atom_count: usize,
    pub(crate) bonds: Vec<BondTerm>,
    pub(crate) angles: Vec<AngleTerm>,
    pub(crate) vdw: Vec<VdwTerm>,
}

impl MolecularForceField {
    pub fn bonds(&self) -> &[BondTerm] {
        &self.bonds
    }

    pub fn angles(&self) -> &[AngleTerm] {
        &self.angles
    }

    pub fn vdw_pairs(&self) -> &[VdwTerm] {
        &self.vdw
    }
}

impl ForceField for MolecularForceField {
    fn atom_count(&self) -> usize {
        self.atom_count
    }

    fn energy_and_gradient(
        &self,
        positions: &[Point3<f64>],
        gradient: &mut [Vector3<f64>],
    ) -> f64 {
        gradient.fill(Vector3::zeros());
        let mut energy = 0.0;

        for term in &self.bonds {
            let [a, b] = term.atoms;
            let offset = positions[b] - positions[a];
            let dist = offset.norm();
            let (e, de) = potentials::harmonic(dist, term.length, term.stiffness);
            energy += e;
            if dist > 1e-12 {
                let force = offset * (de / dist);
                gradient[b] += force;
                gradient[a] -= force;
            }
        }

        for term in &self.angles {
            let [a, center, c] = term.atoms;
            let u = positions[a] - positions[center];
            let v = positions[c] - positions[center];
            let (nu, nv) = (u.norm(), v.norm());
            if nu < 1e-12 || nv < 1e-12 {
                continue;
            }
            let cos = u.dot(&v) / (nu * nv);
            let (e, de) = potentials::harmonic(cos, term.cos_ideal, term.stiffness);
            energy += e;

            let d_a = (v / (nu * nv) - u * (cos / (nu * nu))) * de;
            let d_c = (u / (nu * nv) - v * (cos / (nv * nv))) * de;
            gradient[a] += d_a;
            gradient[c] += d_c;
            gradient[center] -= d_a + d_c;
        }

        for term in &self.vdw {
            let [a, b] = term.atoms;
            let offset = positions[b] - positions[a];
            let dist = offset.norm();
            let (e, de) =
                potentials::lennard_jones_12_6_with_derivative(dist, term.r_min, term.well_depth);
            energy += e;
            if dist > 1e-12 {
                let force = offset * (de / dist);
                gradient[b] += force;
                gradient[a] -= force;
            }
        }

        energy
    }

    fn energy(&self, positions: &[Point3<f64>]) -> f64 {
        let bonds: f64 = self
            .bonds
            .iter()
            .map(|term| {
                let dist = (positions[term.atoms[1]] - positions[term.atoms[0]]).norm();
                potentials::harmonic(dist, term.length, term.stiffness).0
            })
            .sum();
        let angles: f64 = self
            .angles
            .iter()
            .filter_map(|term| {
                let [a, center, c] = term.atoms;
                let u = positions[a] - positions[center];
                let v = positions[c] - positions[center];
                let denom = u.norm() * v.norm();
                (denom >= 1e-24).then(|| {
                    potentials::harmonic(u.dot(&v) / denom, term.cos_ideal, term.stiffness).0
                })
            })
            .sum();
        let vdw: f64 = self
            .vdw
            .iter()
            .map(|term| {
                let dist = (positions[term.atoms[1]] - positions[term.atoms[0]]).norm();
                potentials::lennard_jones_12_6(dist, term.r_min, term.well_depth)
            })
            .sum();
        bonds + angles + vdw
    }
}
