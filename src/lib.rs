//! The `fieldbend` crate provides tools for relating the curvature of field lines
//! in sampled 3D vector fields to the displacement between their end points.
pub mod error;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod num;
pub mod random;
pub mod sampling;
pub mod tracing;

#[cfg(feature = "cli")]
pub mod cli;
