//! Estimating the curvature of field lines from the field vectors along them.

use super::stepping::LatticeStepper3;
use crate::{
    geometry::{Idx3, Vec3},
    grid::FieldGrid,
    num::{self, BFloat},
};

/// Computes the discrete curvature of a curve from three consecutive tangent samples.
///
/// The middle sample is taken as the first derivative of the curve and the central
/// difference of the outer samples as the second derivative, giving
/// `|r' x r''| / |r'|^3`.
///
/// # Returns
///
/// The non-negative curvature, or `None` if the middle sample has zero length.
pub fn discrete_curvature<F: BFloat>(
    previous: &Vec3<F>,
    current: &Vec3<F>,
    next: &Vec3<F>,
) -> Option<F> {
    let first_derivative = current;
    let second_derivative = (next - previous) / num::from_f64(2.0);

    let speed = first_derivative.length();
    if speed == F::zero() {
        return None;
    }
    Some(first_derivative.cross(&second_derivative).length() / (speed * speed * speed))
}

/// Estimator of field line curvature at lattice cells, using a lattice stepper
/// to find the two cells following each cell along the field.
#[derive(Clone, Debug)]
pub struct CurvatureEstimator3<St: LatticeStepper3> {
    stepper: St,
}

impl<St: LatticeStepper3> CurvatureEstimator3<St> {
    /// Creates a new curvature estimator using the given stepper.
    pub fn new(stepper: St) -> Self {
        CurvatureEstimator3 { stepper }
    }

    /// Returns a reference to the stepper.
    pub fn stepper(&self) -> &St {
        &self.stepper
    }

    /// Estimates the curvature of the field line through the given cell.
    ///
    /// # Parameters
    ///
    /// - `grid`: Grid holding the field.
    /// - `indices`: Index of the cell to estimate the curvature at.
    ///
    /// # Returns
    ///
    /// The curvature, or `None` if two forward steps cannot be taken from the cell.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    pub fn curvature<F: BFloat>(&self, grid: &FieldGrid<F>, indices: &Idx3<usize>) -> Option<F> {
        let first = self.stepper.next_position(grid, indices)?;
        let second = self.stepper.next_position(grid, &first)?;
        discrete_curvature(
            grid.field(indices),
            grid.field(&first),
            grid.field(&second),
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        geometry::{In3D, Point3},
        grid::{basis::LocalBasis, fgr},
        tracing::stepping::cone::ConeStepper3,
    };
    use approx::assert_abs_diff_eq;

    fn lattice_grid<S>(field: S) -> FieldGrid<fgr>
    where
        S: Fn(usize, usize, usize) -> Vec3<fgr>,
    {
        FieldGrid::from_world_samples(
            In3D::same(3),
            In3D::same(1.0),
            LocalBasis::standard(),
            |indices| {
                let (i, j, k) = indices.to_tuple();
                (Point3::new(i as fgr, j as fgr, k as fgr), field(i, j, k))
            },
        )
    }

    #[test]
    fn straight_field_has_zero_curvature() {
        let grid = lattice_grid(|_, _, _| Vec3::new(0.0, 0.0, 2.0));
        let estimator = CurvatureEstimator3::new(ConeStepper3::default());
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(estimator.curvature(&grid, &Idx3::new(i, j, 0)), Some(0.0));
            }
        }
    }

    #[test]
    fn curvature_is_undefined_without_two_forward_steps() {
        let grid = lattice_grid(|_, _, _| Vec3::new(0.0, 0.0, 1.0));
        let estimator = CurvatureEstimator3::new(ConeStepper3::default());
        assert_eq!(estimator.curvature(&grid, &Idx3::new(1, 1, 1)), None);
        assert_eq!(estimator.curvature(&grid, &Idx3::new(1, 1, 2)), None);
    }

    #[test]
    fn bending_field_has_positive_curvature() {
        // The line through (1, 1, 0) bends toward +x once it reaches the top layer
        let grid = lattice_grid(|_, _, k| {
            if k == 2 {
                Vec3::new(1.0, 0.0, 1.0)
            } else {
                Vec3::new(0.0, 0.0, 1.0)
            }
        });
        let estimator = CurvatureEstimator3::new(ConeStepper3::default());
        let curvature = estimator.curvature(&grid, &Idx3::new(1, 1, 0)).unwrap();
        assert_abs_diff_eq!(curvature, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn discrete_curvature_of_circle_samples() {
        // Unit speed tangents of a unit circle sampled a quarter turn apart
        let previous = Vec3::new(1.0, 0.0, 0.0);
        let current = Vec3::new(0.0, 1.0, 0.0);
        let next = Vec3::new(-1.0, 0.0, 0.0);
        assert_abs_diff_eq!(
            discrete_curvature(&previous, &current, &next).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn discrete_curvature_is_undefined_for_zero_tangent() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(discrete_curvature(&v, &Vec3::zero(), &v), None);
    }
}
