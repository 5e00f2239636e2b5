//! # Topology Module
//!
//! Perception of torsional degrees of freedom. [`rotatable::RotatableBondAnalyzer`] walks the
//! bond graph once per molecule, rejecting ring, terminal, and linear bonds, and records for
//! every rotatable bond its dihedral quadruple, the smaller side that moves with the torsion,
//! and a relevance weight used to scale Monte Carlo perturbations.

pub mod rotatable;
