//! Regular lattice of vector field samples.

pub mod basis;

use self::basis::LocalBasis;
use crate::{
    geometry::{
        Dim3::{X, Y, Z},
        Idx3, In3D, Point3, Vec3,
    },
    num::BFloat,
};
use ndarray::prelude::*;
use std::fmt;
use thiserror::Error;

/// Floating-point precision to use for grid data.
#[allow(non_camel_case_types)]
pub type fgr = f64;

/// Position and field vector stored at one lattice cell, both in local basis components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell<F: BFloat> {
    pub position: Point3<F>,
    pub field: Vec3<F>,
}

/// Access of a lattice index outside the grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Index {indices} is outside grid with shape {shape}")]
pub struct OutOfBoundsError {
    pub indices: Idx3<isize>,
    pub shape: In3D<usize>,
}

/// Dense 3D lattice of position and field vector samples expressed in a local basis.
///
/// The grid is populated once at construction and is read-only afterwards
/// (apart from explicit `at_mut` access).
#[derive(Clone)]
pub struct FieldGrid<F: BFloat> {
    shape: In3D<usize>,
    spacing: In3D<F>,
    basis: LocalBasis<F>,
    cells: Array3<GridCell<F>>,
}

impl<F: BFloat> FieldGrid<F> {
    /// Creates a new grid from cells already expressed in the local basis.
    ///
    /// # Parameters
    ///
    /// - `shape`: Number of cells along each axis.
    /// - `spacing`: Cell extent along each basis axis.
    /// - `basis`: Local coordinate frame of the cell data.
    /// - `cells`: Cell data in fill order (x fastest, then y, then z).
    ///
    /// # Returns
    ///
    /// A new `FieldGrid`.
    pub fn from_local_cells(
        shape: In3D<usize>,
        spacing: In3D<F>,
        basis: LocalBasis<F>,
        cells: Vec<GridCell<F>>,
    ) -> Self {
        assert!(
            shape[X] > 0 && shape[Y] > 0 && shape[Z] > 0,
            "Grid shape must be non-zero along every axis."
        );
        assert_eq!(
            cells.len(),
            shape[X] * shape[Y] * shape[Z],
            "Number of cells does not match grid shape."
        );
        let cells = Array3::from_shape_vec(shape.to_tuple().f(), cells)
            .expect("Cell count verified against shape");
        Self {
            shape,
            spacing,
            basis,
            cells,
        }
    }

    /// Creates a new grid by evaluating world-space samples for every lattice index
    /// and transforming them into the given local basis.
    ///
    /// # Parameters
    ///
    /// - `shape`: Number of cells along each axis.
    /// - `spacing`: Cell extent along each basis axis.
    /// - `basis`: Local coordinate frame to express the samples in.
    /// - `evaluate_sample`: Closure returning the world-space position and field vector for an index.
    ///
    /// # Returns
    ///
    /// A new `FieldGrid`.
    ///
    /// # Type parameters
    ///
    /// - `S`: Mutable function type taking a 3D index and returning a position and field vector.
    pub fn from_world_samples<S>(
        shape: In3D<usize>,
        spacing: In3D<F>,
        basis: LocalBasis<F>,
        mut evaluate_sample: S,
    ) -> Self
    where
        S: FnMut(&Idx3<usize>) -> (Point3<F>, Vec3<F>),
    {
        let cells = lattice_indices(&shape)
            .map(|indices| {
                let (position, field) = evaluate_sample(&indices);
                GridCell {
                    position: basis.to_basis_pos(&position),
                    field: basis.to_basis(&field),
                }
            })
            .collect();
        Self::from_local_cells(shape, spacing, basis, cells)
    }

    /// Returns the number of cells along each axis.
    pub fn shape(&self) -> &In3D<usize> {
        &self.shape
    }

    /// Returns the cell extent along each basis axis.
    pub fn spacing(&self) -> &In3D<F> {
        &self.spacing
    }

    /// Returns the local coordinate frame of the grid data.
    pub fn basis(&self) -> &LocalBasis<F> {
        &self.basis
    }

    /// Returns the world-space origin of the local frame.
    pub fn center(&self) -> &Point3<F> {
        self.basis.center()
    }

    /// Returns the total number of cells.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns the smallest number of cells along any axis.
    pub fn min_extent(&self) -> usize {
        usize::min(self.shape[X], usize::min(self.shape[Y], self.shape[Z]))
    }

    /// Returns an iterator over all lattice indices in fill order.
    pub fn indices(&self) -> impl Iterator<Item = Idx3<usize>> {
        lattice_indices(&self.shape)
    }

    /// Whether the given (possibly negative) index lies inside the grid.
    pub fn contains(&self, indices: &Idx3<isize>) -> bool {
        Idx3::<usize>::checked_from(indices).map_or(false, |indices| self.contains_unsigned(&indices))
    }

    fn contains_unsigned(&self, indices: &Idx3<usize>) -> bool {
        indices[X] < self.shape[X] && indices[Y] < self.shape[Y] && indices[Z] < self.shape[Z]
    }

    /// Returns the cell at the given index.
    ///
    /// # Panics
    ///
    /// If the index is outside the grid.
    pub fn at(&self, indices: &Idx3<usize>) -> &GridCell<F> {
        match self.get(indices) {
            Some(cell) => cell,
            None => panic!("Index {} is outside grid with shape {}", indices, self.shape),
        }
    }

    /// Returns a mutable reference to the cell at the given index.
    ///
    /// # Panics
    ///
    /// If the index is outside the grid.
    pub fn at_mut(&mut self, indices: &Idx3<usize>) -> &mut GridCell<F> {
        let shape = self.shape;
        match self.cells.get_mut(indices.to_tuple()) {
            Some(cell) => cell,
            None => panic!("Index {} is outside grid with shape {}", indices, shape),
        }
    }

    /// Returns the cell at the given index, or `None` if it is outside the grid.
    pub fn get(&self, indices: &Idx3<usize>) -> Option<&GridCell<F>> {
        self.cells.get(indices.to_tuple())
    }

    /// Returns the cell at the given (possibly negative) index, or an error
    /// describing the out-of-bounds access.
    pub fn checked_at(&self, indices: &Idx3<isize>) -> Result<&GridCell<F>, OutOfBoundsError> {
        Idx3::<usize>::checked_from(indices)
            .and_then(|unsigned| self.get(&unsigned))
            .ok_or(OutOfBoundsError {
                indices: *indices,
                shape: self.shape,
            })
    }

    /// Returns the local-basis position of the cell at the given index.
    pub fn position(&self, indices: &Idx3<usize>) -> &Point3<F> {
        &self.at(indices).position
    }

    /// Returns the local-basis field vector of the cell at the given index.
    pub fn field(&self, indices: &Idx3<usize>) -> &Vec3<F> {
        &self.at(indices).field
    }

    /// Expresses a world-space vector in the local basis of the grid.
    pub fn to_basis(&self, vector: &Vec3<F>) -> Vec3<F> {
        self.basis.to_basis(vector)
    }

    /// Expresses a local-basis vector in world space.
    pub fn from_basis(&self, vector: &Vec3<F>) -> Vec3<F> {
        self.basis.from_basis(vector)
    }

    /// Expresses a world-space position in the local frame of the grid.
    pub fn to_basis_pos(&self, position: &Point3<F>) -> Point3<F> {
        self.basis.to_basis_pos(position)
    }

    /// Expresses a local-frame position in world space.
    pub fn from_basis_pos(&self, position: &Point3<F>) -> Point3<F> {
        self.basis.from_basis_pos(position)
    }
}

impl<F: BFloat> fmt::Debug for FieldGrid<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldGrid")
            .field("shape", &self.shape)
            .field("spacing", &self.spacing)
            .field("basis", &self.basis)
            .finish_non_exhaustive()
    }
}

/// Iterates over all indices of a lattice with the given shape, x fastest.
fn lattice_indices(shape: &In3D<usize>) -> impl Iterator<Item = Idx3<usize>> {
    let (nx, ny, nz) = shape.to_tuple();
    (0..nz).flat_map(move |k| (0..ny).flat_map(move |j| (0..nx).map(move |i| Idx3::new(i, j, k))))
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    fn skewed_grid() -> FieldGrid<fgr> {
        let basis = LocalBasis::new(
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 2.0, 3.0),
        )
        .unwrap();
        FieldGrid::from_world_samples(In3D::new(4, 3, 2), In3D::same(1.0), basis, |indices| {
            let (i, j, k) = indices.to_tuple();
            let local = Vec3::new(i as fgr, j as fgr, k as fgr);
            (
                Point3::new(1.0 + 2.0 * local[X] + local[Y], 2.0 + local[Y], 3.0 + 0.5 * local[Z]),
                Vec3::new(0.0, 0.0, 1.0),
            )
        })
    }

    #[test]
    fn world_samples_are_stored_in_local_basis() {
        let grid = skewed_grid();
        for indices in grid.indices() {
            let (i, j, k) = indices.to_tuple();
            assert_abs_diff_eq!(
                *grid.position(&indices),
                Point3::new(i as fgr, j as fgr, k as fgr),
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(*grid.field(&indices), Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn indices_follow_fill_order() {
        let grid = skewed_grid();
        let indices: Vec<_> = grid.indices().collect();
        assert_eq!(indices.len(), grid.n_cells());
        assert_eq!(indices[0], Idx3::new(0, 0, 0));
        assert_eq!(indices[1], Idx3::new(1, 0, 0));
        assert_eq!(indices[4], Idx3::new(0, 1, 0));
        assert_eq!(indices[12], Idx3::new(0, 0, 1));
        assert_eq!(*indices.last().unwrap(), Idx3::new(3, 2, 1));
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let grid = skewed_grid();
        assert!(grid.contains(&Idx3::new(3, 2, 1)));
        assert!(!grid.contains(&Idx3::new(4, 0, 0)));
        assert!(!grid.contains(&Idx3::new(0, -1, 0)));
        assert!(grid.get(&Idx3::new(0, 3, 0)).is_none());
        assert_eq!(
            grid.checked_at(&Idx3::new(0, 0, 2)).unwrap_err(),
            OutOfBoundsError {
                indices: Idx3::new(0, 0, 2),
                shape: In3D::new(4, 3, 2)
            }
        );
        assert!(grid.checked_at(&Idx3::new(1, 1, 1)).is_ok());
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn unchecked_out_of_bounds_access_panics() {
        let grid = skewed_grid();
        grid.at(&Idx3::new(0, 0, 5));
    }

    #[test]
    fn cells_can_be_modified_in_place() {
        let mut grid = skewed_grid();
        let indices = Idx3::new(2, 1, 0);
        grid.at_mut(&indices).field = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(*grid.field(&indices), Vec3::new(1.0, 0.0, 0.0));
    }
}
