//! # Descriptors Module
//!
//! Gaussian representations of molecular shape and pharmacophore features.
//!
//! - [`gaussian`] - The [`gaussian::Gaussian`] trait, the shared overlap kernel, atomic and
//!   volume-correction Gaussians
//! - [`pharmacophore`] - Feature Gaussians with type weights and pairwise similarity
//! - [`volume`] - [`volume::MolecularVolume`], the descriptor set built from a molecule
//!
//! Every Gaussian remembers the atom it belongs to, so Cartesian gradients computed on
//! Gaussian centers can be accumulated directly on atoms.

pub mod gaussian;
pub mod pharmacophore;
pub mod volume;
