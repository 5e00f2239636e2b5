//! # Force Field Module
//!
//! A small molecular mechanics force field used to measure and relax conformational strain
//! during flexible alignment.
//!
//! ## Overview
//!
//! The alignment objective penalizes conformations whose potential energy rises too far above
//! the relaxed baseline, so it needs an energy with an analytic Cartesian gradient. The
//! [`energy::ForceField`] trait is that seam; [`energy::MolecularForceField`] is the built-in
//! implementation with:
//!
//! - **Harmonic bonds** with ideal lengths from covalent radii and bond order
//! - **Cosine-harmonic angles** with ideal angles from the bond orders around the center
//! - **Lennard-Jones 12-6 pairs** for atoms three or more bonds apart, with scaled 1-4 pairs
//!
//! ## Key Components
//!
//! - [`params`] - Per-element parameters, built-in tables or TOML files
//! - [`parameterization`] - Builds the term lists of a molecule
//! - [`restraint`] - Flat-bottom positional restraint
//! - [`minimize`] - L-BFGS minimization of energy plus optional restraint
//!
//! ```ignore
//! use phesa::core::forcefield::{parameterization::Parameterizer, params::ForcefieldParams};
//!
//! let params = ForcefieldParams::default();
//! let forcefield = Parameterizer::new(&params).parameterize(&molecule)?;
//! let energy = forcefield.energy(&molecule.positions());
//! ```

pub mod energy;
pub mod minimize;
pub mod parameterization;
pub mod params;
pub(crate) mod potentials;
pub mod restraint;
