//! # Math Module
//!
//! Rotation parameterizations used by the pose pipeline. [`rotation::Rotation3`]
//! wraps an exponential-map vector and exposes the matrix, the quaternion, and
//! the analytic partial derivatives needed to backpropagate Cartesian gradients
//! into the three rotational degrees of freedom.

pub mod rotation;
