//! # Optimize Module
//!
//! Generic local optimization over flat state vectors.
//!
//! - [`evaluable`] - The [`evaluable::Evaluable`] trait implemented by objectives
//! - [`lbfgs`] - [`lbfgs::LbfgsOptimizer`], bounded-iteration limited-memory BFGS

pub mod evaluable;
pub mod lbfgs;
