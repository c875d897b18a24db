//! Geometric utility objects.

use crate::num::BFloat;
use num;
use std::{
    fmt,
    ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

#[cfg(any(test, feature = "for-testing"))]
use approx::AbsDiffEq;

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
            }
        )
    }
}

use Dim3::{X, Y, Z};

/// Represents any quantity with three dimensional components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct In3D<T>([T; 3]);

impl<T> In3D<T> {
    /// Creates a new 3D quantity given the three components.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D quantity by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> T,
    {
        Self::new(
            create_component(X),
            create_component(Y),
            create_component(Z),
        )
    }

    /// Creates a new 3D quantity with the given value copied into all components.
    pub fn same(a: T) -> Self
    where
        T: Copy,
    {
        Self([a, a, a])
    }

    /// Creates a new tuple containing copies of the three components.
    pub fn to_tuple(&self) -> (T, T, T)
    where
        T: Copy,
    {
        (self[X], self[Y], self[Z])
    }
}

impl<T> Index<Dim3> for In3D<T> {
    type Output = T;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim3> for In3D<T> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<T: fmt::Display> fmt::Display for In3D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str("]")
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl<T> AbsDiffEq for In3D<T>
where
    T: AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = <T as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        T::abs_diff_eq(&self[X], &other[X], epsilon)
            && T::abs_diff_eq(&self[Y], &other[Y], epsilon)
            && T::abs_diff_eq(&self[Z], &other[Z], epsilon)
    }
}

#[cfg(any(test, feature = "for-testing"))]
macro_rules! impl_approx_eq_3d {
    ($T:ident <$F:ident>) => {
        impl<$F> AbsDiffEq for $T<$F>
        where
            $F: BFloat + AbsDiffEq,
            $F::Epsilon: Copy,
        {
            type Epsilon = <In3D<$F> as AbsDiffEq>::Epsilon;

            fn default_epsilon() -> Self::Epsilon {
                In3D::<$F>::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                In3D::<$F>::abs_diff_eq(&self.0, &other.0, epsilon)
            }
        }
    };
}

/// A 3D spatial vector.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec3<F>(In3D<F>);

impl<F: BFloat> Vec3<F> {
    /// Creates a new 3D vector given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self(In3D::with_each_component(create_component))
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Constructs a new point from the vector components.
    pub fn to_point3(&self) -> Point3<F> {
        Point3::with_each_component(|dim| self[dim])
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self[X] * self[X] + self[Y] * self[Y] + self[Z] * self[Z]
    }

    /// Computes the length of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Computes the dot product of the vector with another vector.
    pub fn dot(&self, other: &Self) -> F {
        self[X] * other[X] + self[Y] * other[Y] + self[Z] * other[Z]
    }

    /// Computes the cross product of the vector with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[Y] * other[Z] - self[Z] * other[Y],
            self[Z] * other[X] - self[X] * other[Z],
            self[X] * other[Y] - self[Y] * other[X],
        )
    }

    /// Computes the angle in degrees between the vector and another vector.
    ///
    /// The result is NaN if either vector has zero length.
    pub fn angle_degrees_to(&self, other: &Self) -> F {
        let cosine = self.dot(other) / (self.length() * other.length());
        // Rounding can push the cosine of (anti)parallel vectors just outside [-1, 1]
        let cosine = if cosine.is_nan() {
            cosine
        } else {
            cosine.max(-F::one()).min(F::one())
        };
        cosine.acos().to_degrees()
    }
}

impl<F: BFloat> Index<Dim3> for Vec3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Vec3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Self) -> Self::Output {
        Vec3::with_each_component(|dim| self[dim] + other[dim])
    }
}

impl<F: BFloat> Add<Vec3<F>> for Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Vec3::with_each_component(|dim| self[dim] - other[dim])
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Neg for Vec3<F> {
    type Output = Vec3<F>;
    fn neg(self) -> Self::Output {
        Vec3::with_each_component(|dim| -self[dim])
    }
}

impl<F: BFloat> Mul<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        Vec3::with_each_component(|dim| self[dim] * factor)
    }
}

impl<F: BFloat> Mul<F> for Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        &self * factor
    }
}

impl<F: BFloat> Div<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn div(self, divisor: F) -> Self::Output {
        let factor = F::one() / divisor;
        self * factor
    }
}

impl<F: BFloat> Div<F> for Vec3<F> {
    type Output = Vec3<F>;
    fn div(self, divisor: F) -> Self::Output {
        &self / divisor
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl_approx_eq_3d!(Vec3<F>);

/// A 3D spatial coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Point3<F>(In3D<F>);

impl<F: BFloat> Point3<F> {
    /// Creates a new 3D point given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D point by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self(In3D::with_each_component(create_component))
    }

    /// Creates a new 3D point with all components set to zero.
    pub fn origin() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Constructs a new vector from the point components.
    pub fn to_vec3(&self) -> Vec3<F> {
        Vec3::with_each_component(|dim| self[dim])
    }

    /// Computes the Euclidean distance to another point.
    pub fn distance_to(&self, other: &Self) -> F {
        (other - self).length()
    }
}

impl<F: BFloat> Index<Dim3> for Point3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Point3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Sub<&'a Point3<F>> for &'a Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Vec3::with_each_component(|dim| self[dim] - other[dim])
    }
}

impl<F: BFloat> Sub<Self> for Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Point3<F> {
    type Output = Point3<F>;
    fn add(self, vector: &'a Vec3<F>) -> Self::Output {
        Point3::with_each_component(|dim| self[dim] + vector[dim])
    }
}

impl<F: BFloat> Add<Vec3<F>> for Point3<F> {
    type Output = Point3<F>;
    fn add(self, vector: Vec3<F>) -> Self::Output {
        &self + &vector
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Point3<F> {
    type Output = Point3<F>;
    fn sub(self, vector: &'a Vec3<F>) -> Self::Output {
        Point3::with_each_component(|dim| self[dim] - vector[dim])
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Point3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl_approx_eq_3d!(Point3<F>);

/// A 3D index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Idx3<I>(In3D<I>);

impl<I: num::Integer> Idx3<I> {
    /// Creates a new 3D index given the three components.
    pub fn new(i: I, j: I, k: I) -> Self {
        Self(In3D::new(i, j, k))
    }

    /// Creates a new 3D index from the given index, which may have a different component type.
    ///
    /// Returns `None` if any component is not representable by `I`.
    pub fn checked_from<U>(other: &Idx3<U>) -> Option<Self>
    where
        I: num::NumCast,
        U: num::Integer + num::NumCast + Copy,
    {
        Some(Self::new(
            I::from(other[X])?,
            I::from(other[Y])?,
            I::from(other[Z])?,
        ))
    }

    /// Creates a new 3D index from the given index, which may have a different component type.
    pub fn from<U>(other: &Idx3<U>) -> Self
    where
        I: num::NumCast,
        U: num::Integer + num::NumCast + Copy,
    {
        Self::checked_from(other).expect("Conversion failed")
    }

    /// Returns a tuple of the components, suitable for indexing `ndarray` arrays.
    pub fn to_tuple(&self) -> (I, I, I)
    where
        I: Copy,
    {
        self.0.to_tuple()
    }
}

impl<I: num::Integer> Index<Dim3> for Idx3<I> {
    type Output = I;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<I: num::Integer> IndexMut<Dim3> for Idx3<I> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<I: num::Integer + fmt::Display> fmt::Display for Idx3<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A 3x3 matrix stored as three rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3<F>([[F; 3]; 3]);

impl<F: BFloat> Matrix3<F> {
    /// Creates a new matrix with the given vectors as columns.
    pub fn from_columns(first: &Vec3<F>, second: &Vec3<F>, third: &Vec3<F>) -> Self {
        Self([
            [first[X], second[X], third[X]],
            [first[Y], second[Y], third[Y]],
            [first[Z], second[Z], third[Z]],
        ])
    }

    /// Creates a new identity matrix.
    pub fn identity() -> Self {
        let (o, l) = (F::zero(), F::one());
        Self([[l, o, o], [o, l, o], [o, o, l]])
    }

    /// Returns the element at the given row and column.
    pub fn get(&self, row: Dim3, column: Dim3) -> F {
        self.0[row as usize][column as usize]
    }

    /// Computes the determinant of the matrix.
    pub fn determinant(&self) -> F {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse of the matrix.
    ///
    /// Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == F::zero() || !det.is_finite() {
            return None;
        }
        let m = &self.0;
        let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        let inv_det = det.recip();
        // Transposed cofactor matrix scaled by the inverse determinant
        Some(Self([
            [
                cofactor(1, 2, 1, 2) * inv_det,
                -cofactor(0, 2, 1, 2) * inv_det,
                cofactor(0, 1, 1, 2) * inv_det,
            ],
            [
                -cofactor(1, 2, 0, 2) * inv_det,
                cofactor(0, 2, 0, 2) * inv_det,
                -cofactor(0, 1, 0, 2) * inv_det,
            ],
            [
                cofactor(1, 2, 0, 1) * inv_det,
                -cofactor(0, 2, 0, 1) * inv_det,
                cofactor(0, 1, 0, 1) * inv_det,
            ],
        ]))
    }
}

impl<'a, F: BFloat> Mul<&'a Vec3<F>> for &'a Matrix3<F> {
    type Output = Vec3<F>;
    fn mul(self, vector: &'a Vec3<F>) -> Self::Output {
        Vec3::with_each_component(|row| {
            self.get(row, X) * vector[X] + self.get(row, Y) * vector[Y] + self.get(row, Z) * vector[Z]
        })
    }
}

impl<'a, F: BFloat> Mul<&'a Matrix3<F>> for &'a Matrix3<F> {
    type Output = Matrix3<F>;
    fn mul(self, other: &'a Matrix3<F>) -> Self::Output {
        let mut rows = [[F::zero(); 3]; 3];
        for row in Dim3::slice() {
            for column in Dim3::slice() {
                rows[row as usize][column as usize] = Dim3::slice()
                    .iter()
                    .fold(F::zero(), |sum, &k| {
                        sum + self.get(row, k) * other.get(k, column)
                    });
            }
        }
        Matrix3(rows)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cross_product_is_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn angle_between_parallel_vectors_is_zero() {
        let a = Vec3::new(0.3, -1.7, 2.9);
        let b = &a * 3.0;
        assert_abs_diff_eq!(a.angle_degrees_to(&b), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(
            a.angle_degrees_to(&-b),
            180.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn angle_to_zero_vector_is_nan() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        assert!(a.angle_degrees_to(&Vec3::<f64>::zero()).is_nan());
    }

    #[test]
    fn point_difference_is_displacement() {
        let a = Point3::new(1.0, -2.0, 0.5);
        let b = Point3::new(4.0, 2.0, 0.5);
        assert_eq!(&b - &a, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(b - a, Vec3::new(3.0, 4.0, 0.0));
        assert_abs_diff_eq!(a.distance_to(&b), 5.0, epsilon = 1e-12);
        assert_eq!(&a + &(&b - &a), b);
    }

    #[test]
    fn matrix_inverse_gives_identity() {
        let matrix = Matrix3::from_columns(
            &Vec3::new(1.0, 0.2, 0.0),
            &Vec3::new(0.5, 1.0, 0.3),
            &Vec3::new(-0.1, 0.4, 2.0),
        );
        let inverse = matrix.inverse().unwrap();
        let product = &matrix * &inverse;
        let identity = Matrix3::identity();
        for row in Dim3::slice() {
            for column in Dim3::slice() {
                assert_abs_diff_eq!(
                    product.get(row, column),
                    identity.get(row, column),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let matrix = Matrix3::from_columns(
            &Vec3::new(1.0, 2.0, 3.0),
            &Vec3::new(2.0, 4.0, 6.0),
            &Vec3::new(0.0, 0.0, 1.0),
        );
        assert!(matrix.inverse().is_none());
    }
}
