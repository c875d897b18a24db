//! Utilities related to random numbers.

use crate::geometry::{
    Dim3::{X, Y, Z},
    Idx3, In3D,
};
use rand::{
    distributions::Uniform,
    rngs::StdRng,
    Rng, SeedableRng,
};

/// Creates the pseudo-random number generator used for sampling, seeded with the given value.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws the maximum number of steps to trace in a single trial.
///
/// # Parameters
///
/// - `rng`: Random number generator to draw with.
/// - `min_extent`: Smallest number of grid cells along any axis.
/// - `offset`: Minimum number of steps.
///
/// # Returns
///
/// `offset` plus a uniformly drawn integer in `[0, max(1, min_extent / 2))`.
pub fn draw_trace_length<R: Rng + ?Sized>(rng: &mut R, min_extent: usize, offset: usize) -> usize {
    let range = usize::max(1, min_extent / 2);
    offset + rng.sample(Uniform::new(0, range))
}

/// Draws a lattice index uniformly from a grid with the given shape.
///
/// Each component is drawn independently from `[0, n)` for the corresponding extent `n`.
pub fn draw_lattice_index<R: Rng + ?Sized>(rng: &mut R, shape: &In3D<usize>) -> Idx3<usize> {
    let i = rng.sample(Uniform::new(0, shape[X]));
    let j = rng.sample(Uniform::new(0, shape[Y]));
    let k = rng.sample(Uniform::new(0, shape[Z]));
    Idx3::new(i, j, k)
}
