//! Utilities related to numbers.

use num;
use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    Sync + Send + num::Float + num::cast::FromPrimitive + fmt::Debug + fmt::Display
{
}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Converts the given `f64` constant into the float type `F`.
pub fn from_f64<F: BFloat>(value: f64) -> F {
    F::from_f64(value).expect("Conversion failed")
}
