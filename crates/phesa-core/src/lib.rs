//! # PheSA Flexible Alignment Library
//!
//! Flexible shape and pharmacophore alignment of a small molecule onto a rigid reference
//! conformation, scored by a Gaussian-overlap Tanimoto and penalized by conformational strain.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Molecule models, Gaussian descriptors, rotatable-bond
//!   perception, the force field, rotation math, and the L-BFGS optimizer.
//!
//! - **[`engine`]: The Logic Core.** The pose pipeline that maps a state vector (translation,
//!   exponential-map rotation, torsions) to coordinates, the overlap evaluator, the penalized
//!   objective, and the Metropolis torsion perturbator, together with configuration, errors,
//!   and progress reporting.
//!
//! - **[`workflows`]: The Public API.** [`workflows::align`] ties everything together:
//!   strain baseline, restrained relaxation, local optimization, and Monte Carlo refinement.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
mod test_utils;
