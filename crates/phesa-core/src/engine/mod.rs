//! # Engine Module
//!
//! The alignment engine: everything needed to score a flexible pose of the fit molecule
//! against a fixed reference and to search over poses.
//!
//! ## Architecture
//!
//! - **Pose Pipeline** ([`pose`]) - State vector to coordinates, and the chain rule back
//! - **Overlap Evaluation** ([`overlap`]) - Cross and self Gaussian overlaps with gradients
//! - **Objective** ([`objective`]) - Blended Tanimoto with a squared strain penalty
//! - **Perturbation** ([`perturbation`]) - Relevance-scaled torsion kicks and the Metropolis rule
//! - **Configuration** ([`config`]) - Scoring, optimizer, relaxation, and Monte Carlo settings
//! - **State Tracking** ([`state`]) - Alignment results and the Monte Carlo trace
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod config;
pub mod error;
pub mod objective;
pub mod overlap;
pub mod perturbation;
pub mod pose;
pub mod progress;
pub mod state;
