//! # Workflows Module
//!
//! Top-level entry points of the library.
//!
//! - **Alignment Workflow** ([`align`]) - Flexible alignment of one fit molecule onto one
//!   reference: strain baseline, restrained relaxation, local optimization, and Monte Carlo
//!   refinement over torsions.

pub mod align;
