//! # Core Module
//!
//! Stateless building blocks for flexible molecular alignment: molecule models, Gaussian
//! descriptors, torsional topology, a small force field, rotation math, and a generic
//! local optimizer.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, and molecules with one conformation
//! - **Shape Descriptors** ([`descriptors`]) - Atomic, volume, and pharmacophore Gaussians
//! - **Torsional Topology** ([`topology`]) - Rotatable bonds and their moving sides
//! - **Energy Calculations** ([`forcefield`]) - Parameters, potentials, restraints, minimization
//! - **Rotation Math** ([`math`]) - Exponential-map rotations with analytic derivatives
//! - **Local Optimization** ([`optimize`]) - The `Evaluable` seam and L-BFGS
//! - **Geometry Helpers** ([`utils`]) - Dihedrals, axis rotations, centroids, RMSD

pub mod descriptors;
pub mod forcefield;
pub mod math;
pub mod models;
pub mod optimize;
pub mod topology;
pub mod utils;
