//! Stepping from lattice cell to lattice cell along a vector field.

pub mod cone;

use crate::{geometry::Idx3, grid::FieldGrid, num::BFloat};

/// Defines the properties of a scheme for stepping between lattice cells.
pub trait LatticeStepper3 {
    /// Selects the lattice cell to step to from the given cell.
    ///
    /// # Parameters
    ///
    /// - `grid`: Grid holding the field to follow.
    /// - `indices`: Index of the current cell.
    ///
    /// # Returns
    ///
    /// The index of the next cell, or `None` if no admissible next cell exists.
    /// A returned index always lies inside the grid.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    fn next_position<F: BFloat>(
        &self,
        grid: &FieldGrid<F>,
        indices: &Idx3<usize>,
    ) -> Option<Idx3<usize>>;
}

impl<St: LatticeStepper3> LatticeStepper3 for &St {
    fn next_position<F: BFloat>(
        &self,
        grid: &FieldGrid<F>,
        indices: &Idx3<usize>,
    ) -> Option<Idx3<usize>> {
        (*self).next_position(grid, indices)
    }
}
