//! Local coordinate frame that world-space samples are re-expressed in.

use crate::{
    geometry::{Matrix3, Point3, Vec3},
    num::{self, BFloat},
};

/// Smallest accepted volume spanned by the basis vectors, relative to the
/// product of their lengths.
pub const MIN_RELATIVE_BASIS_VOLUME: f64 = 1e-10;

/// A (generally non-orthonormal) coordinate frame spanned by three basis vectors
/// and centered at a given world-space point.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalBasis<F: BFloat> {
    basis_vectors: [Vec3<F>; 3],
    center: Point3<F>,
    to_basis_transform: Matrix3<F>,
    from_basis_transform: Matrix3<F>,
}

impl<F: BFloat> LocalBasis<F> {
    /// Creates a new local basis from the two in-plane basis vectors, the normal
    /// vector and the world-space center.
    ///
    /// # Returns
    ///
    /// `None` if the three basis vectors are not linearly independent, or so close
    /// to dependent that the volume they span is below `MIN_RELATIVE_BASIS_VOLUME`
    /// times the product of their lengths.
    pub fn new(v1: Vec3<F>, v2: Vec3<F>, normal: Vec3<F>, center: Point3<F>) -> Option<Self> {
        let from_basis_transform = Matrix3::from_columns(&v1, &v2, &normal);
        let length_product = v1.length() * v2.length() * normal.length();
        let min_volume = num::from_f64::<F>(MIN_RELATIVE_BASIS_VOLUME) * length_product;
        if !(from_basis_transform.determinant().abs() > min_volume) {
            return None;
        }
        let to_basis_transform = from_basis_transform.inverse()?;
        Some(Self {
            basis_vectors: [v1, v2, normal],
            center,
            to_basis_transform,
            from_basis_transform,
        })
    }

    /// Creates the standard basis centered at the world origin.
    pub fn standard() -> Self {
        Self {
            basis_vectors: [
                Vec3::new(F::one(), F::zero(), F::zero()),
                Vec3::new(F::zero(), F::one(), F::zero()),
                Vec3::new(F::zero(), F::zero(), F::one()),
            ],
            center: Point3::origin(),
            to_basis_transform: Matrix3::identity(),
            from_basis_transform: Matrix3::identity(),
        }
    }

    /// Returns the three basis vectors `[V1, V2, Normal]` in world coordinates.
    pub fn basis_vectors(&self) -> &[Vec3<F>; 3] {
        &self.basis_vectors
    }

    /// Returns the world-space origin of the local frame.
    pub fn center(&self) -> &Point3<F> {
        &self.center
    }

    /// Returns the matrix mapping world components to local components.
    pub fn to_basis_transform(&self) -> &Matrix3<F> {
        &self.to_basis_transform
    }

    /// Returns the matrix mapping local components to world components.
    pub fn from_basis_transform(&self) -> &Matrix3<F> {
        &self.from_basis_transform
    }

    /// Expresses a world-space vector in the local basis.
    pub fn to_basis(&self, vector: &Vec3<F>) -> Vec3<F> {
        &self.to_basis_transform * vector
    }

    /// Expresses a local-basis vector in world space.
    pub fn from_basis(&self, vector: &Vec3<F>) -> Vec3<F> {
        &self.from_basis_transform * vector
    }

    /// Expresses a world-space position in the local frame, relative to the center.
    pub fn to_basis_pos(&self, position: &Point3<F>) -> Point3<F> {
        (&self.to_basis_transform * &(position - &self.center)).to_point3()
    }

    /// Expresses a local-frame position in world space.
    pub fn from_basis_pos(&self, position: &Point3<F>) -> Point3<F> {
        &self.center + &(&self.from_basis_transform * &position.to_vec3())
    }
}
