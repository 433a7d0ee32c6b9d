use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::tuple::{ Point3D, Vector3D };

/// A 2x2 matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
struct Matrix2D {
    data: [f64; 4],
}

impl Index<(usize, usize)> for Matrix2D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 2) + index.1]
    }
}

/// A 3x3 matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
struct Matrix3D {
    data: [f64; 9],
}

#[cfg(test)]
impl From<[f64; 9]> for Matrix3D {
    fn from(data: [f64; 9]) -> Matrix3D {
        Matrix3D { data }
    }
}

impl Index<(usize, usize)> for Matrix3D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 3) + index.1]
    }
}

/// A 4x4 homogeneous transformation matrix.
///
/// Every shape owns one of these, mapping object space to world space. Points
/// are transformed with an implicit `w` of `1.0` (so translations apply), and
/// vectors with an implicit `w` of `0.0` (so only the linear part applies).
///
/// Intersection tests run in object space, so the *inverse* of a shape's
/// matrix is what the intersector actually uses. `inverse` is a full general
/// inverse via cofactor expansion, which covers every transform the scene
/// languages can produce (translations, axis-aligned scales, axis rotations
/// and any product of those).
///
/// # Examples
///
/// ```
/// # use pov_tracer::tuple::Point3D;
/// # use pov_tracer::matrix::Matrix4D;
/// let m = Matrix4D::translation(1.0, 2.0, 3.0) * Matrix4D::scaling(2.0, 2.0, 2.0);
/// let p = m * Point3D::new(1.0, 1.0, 1.0);
/// assert_eq!(p, Point3D::new(3.0, 4.0, 5.0));
/// assert_eq!(m.inverse().unwrap() * p, Point3D::new(1.0, 1.0, 1.0));
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

impl Matrix2D {
    /// Calculates the determinant of a `Matrix2D`.
    fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

impl Matrix3D {
    /// Returns the submatrix with row `row` and column `col` removed.
    fn submatrix(&self, row: usize, col: usize) -> Matrix2D {
        let mut buf: [f64; 4] = [0.0; 4];
        let mut count = 0;

        for r in 0..3 {
            for c in 0..3 {
                if !(r == row || c == col) {
                    buf[count] = self[(r, c)];
                    count += 1;
                }
            }
        }

        Matrix2D { data: buf }
    }

    fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
    }

    fn determinant(&self) -> f64 {
        (0..3).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }
}

/// Determines whether two `Matrix4D`s are (approximately) equal.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Default for Matrix4D {
    fn default() -> Matrix4D {
        Matrix4D::identity()
    }
}

impl Matrix4D {
    /// Creates a new `Matrix4D`. All elements are initialized to `0.0`.
    pub fn new() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    /// Instantiates a 4x4 identity matrix.
    pub fn identity() -> Matrix4D {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4D { data: buf }
    }

    /// Instantiates a translation matrix offsetting points by `x`, `y`, `z`.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// Instantiates an axis-aligned scaling matrix.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Instantiates a rotation about the X axis. `r` is in radians.
    ///
    /// ```
    /// # use pov_tracer::tuple::Point3D;
    /// # use pov_tracer::matrix::Matrix4D;
    /// let m = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * Point3D::new(0.0, 1.0, 0.0), Point3D::new(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation about the Y axis. `r` is in radians.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation about the Z axis. `r` is in radians.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Rotation by per-axis angles in degrees, applied X first, then Y, then
    /// Z (the POV-Ray `rotate <x, y, z>` convention).
    pub fn rotation_degrees(angles: Vector3D) -> Matrix4D {
        let to_rad = std::f64::consts::PI / 180.0;

        Matrix4D::rotation_z(angles.z * to_rad)
            * Matrix4D::rotation_y(angles.y * to_rad)
            * Matrix4D::rotation_x(angles.x * to_rad)
    }

    /// Produces the transpose of a matrix, returning a new matrix.
    pub fn transposition(&self) -> Matrix4D {
        let mut buf = *self;

        for r in 0..4 {
            for c in (r+1)..4 {
                buf[(r, c)] = self[(c, r)];
                buf[(c, r)] = self[(r, c)];
            }
        }

        buf
    }

    /// Returns the submatrix with row `row` and column `col` removed.
    fn submatrix(&self, row: usize, col: usize) -> Matrix3D {
        let mut buf: [f64; 9] = [0.0; 9];
        let mut count = 0;

        for r in 0..4 {
            for c in 0..4 {
                if !(r == row || c == col) {
                    buf[count] = self[(r, c)];
                    count += 1;
                }
            }
        }

        Matrix3D { data: buf }
    }

    /// Returns the minor (determinant of the submatrix) at row and column.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// Returns the minor at row and column, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
    }

    /// Calculates the determinant of a `Matrix4D`.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }

    /// Calculates the inverse of a `Matrix4D`, if it exists.
    ///
    /// If the determinant is zero the matrix is non-invertible and `None` is
    /// returned.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        let mut inv = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

/// Multiplication between two matrices.
///
/// Not commutative: `A * B` applies `B` first, then `A`.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::new();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)]
            }
        }

        res
    }
}

/// Transforms a point (implicit `w = 1`).
impl Mul<Point3D> for Matrix4D {
    type Output = Point3D;

    fn mul(self, p: Point3D) -> Point3D {
        let row = |r: usize| self[(r, 0)] * p.x
            + self[(r, 1)] * p.y
            + self[(r, 2)] * p.z
            + self[(r, 3)];

        Point3D { x: row(0), y: row(1), z: row(2) }
    }
}

/// Transforms a vector (implicit `w = 0`, so translations are ignored).
impl Mul<Vector3D> for Matrix4D {
    type Output = Vector3D;

    fn mul(self, v: Vector3D) -> Vector3D {
        let row = |r: usize| self[(r, 0)] * v.x
            + self[(r, 1)] * v.y
            + self[(r, 2)] * v.z;

        Vector3D { x: row(0), y: row(1), z: row(2) }
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            // Don't put a newline on the final row (allow the user to do that)
            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn identity() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
}

#[test]
fn transpose() {
     let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                         9.0, 8.0, 0.0, 8.0,
                         1.0, 8.0, 5.0, 3.0,
                         0.0, 0.0, 5.0, 8.0, ].into();

     let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                         9.0, 8.0, 8.0, 0.0,
                         3.0, 0.0, 5.0, 5.0,
                         0.0, 8.0, 3.0, 8.0, ].into();

     assert_eq!(t, a.transposition());
     assert_eq!(t.transposition(), a);
}

#[test]
fn mat3_determinant() {
     let a: Matrix3D = [  1.0, 2.0,  6.0,
                         -5.0, 8.0, -4.0,
                          2.0, 6.0,  4.0, ].into();

     assert_eq!(a.cofactor(0, 0), 56.0);
     assert_eq!(a.cofactor(0, 1), 12.0);
     assert_eq!(a.cofactor(0, 2), -46.0);
     assert_eq!(a.determinant(), -196.0);
}

#[test]
fn mat4_determinant() {
     let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                         -3.0,  1.0,  7.0,  3.0,
                          1.0,  2.0, -9.0,  6.0,
                         -6.0,  7.0,  7.0, -9.0, ].into();

     assert_eq!(a.cofactor(0, 0), 690.0);
     assert_eq!(a.cofactor(0, 3), 51.0);
     assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn mat4_inverse() {
     let a: Matrix4D = [ -5.0,  2.0,  6.0, -8.0,
                          1.0, -5.0,  1.0,  8.0,
                          7.0,  7.0, -6.0, -7.0,
                          1.0, -3.0,  7.0,  4.0, ].into();

     let i: Matrix4D = [  0.21805,  0.45113,  0.24060, -0.04511,
                         -0.80827, -1.45677, -0.44361,  0.52068,
                         -0.07895, -0.22368, -0.05263,  0.19737,
                         -0.52256, -0.81391, -0.30075,  0.30639, ].into();

     assert_eq!(a.inverse().unwrap(), i);
}

#[test]
fn mat4_inverse_mult() {
     let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                          3.0,  8.0,  2.0, -9.0,
                         -4.0,  4.0,  4.0,  1.0,
                         -6.0,  5.0, -1.0,  1.0, ].into();

     let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                         3.0, -1.0, 7.0, 0.0,
                         7.0,  0.0, 5.0, 4.0,
                         6.0, -2.0, 0.0, 5.0  ].into();

     let c = a * b;

     assert_eq!(a, c * b.inverse().unwrap());
}

#[test]
fn singular_matrix_has_no_inverse() {
    assert!(Matrix4D::scaling(1.0, 0.0, 1.0).inverse().is_none());
}

#[test]
fn translation_moves_points_not_vectors() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let point = Point3D::new(-3.0, 4.0, 5.0);
    let vector = Vector3D::new(-3.0, 4.0, 5.0);

    assert_eq!(transform * point, Point3D::new(2.0, 1.0, 7.0));
    assert_eq!(transform * vector, vector);
    assert_eq!(transform.inverse().unwrap() * point,
        Point3D::new(-8.0, 7.0, 3.0));
}

#[test]
fn scaling_inverse() {
    let transform = Matrix4D::scaling(2.0, 3.0, 4.0).inverse().unwrap();
    let vector = Vector3D::new(-4.0, 6.0, 8.0);

    assert_eq!(transform * vector, Vector3D::new(-2.0, 2.0, 2.0));
}

#[test]
fn rotations() {
    let quarter = std::f64::consts::PI / 2.0;

    assert_eq!(Matrix4D::rotation_y(quarter) * Point3D::new(0.0, 0.0, 1.0),
        Point3D::new(1.0, 0.0, 0.0));
    assert_eq!(Matrix4D::rotation_z(quarter) * Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(-1.0, 0.0, 0.0));
}

#[test]
fn rotation_inverse_undoes_rotation() {
    let m = Matrix4D::rotation_degrees(Vector3D::new(30.0, 45.0, 60.0));
    let p = Point3D::new(1.0, -2.0, 3.0);

    assert_eq!(m.inverse().unwrap() * (m * p), p);
    assert_eq!(m.inverse().unwrap(), m.transposition());
}

#[test]
fn rotation_degrees_applies_x_first() {
    let m = Matrix4D::rotation_degrees(Vector3D::new(90.0, 90.0, 0.0));

    // X takes +Y to +Z, then Y takes +Z to +X.
    assert_eq!(m * Point3D::new(0.0, 1.0, 0.0), Point3D::new(1.0, 0.0, 0.0));
}

#[test]
fn chained_transforms() {
    let a = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);

    let t = c * b * a;
    let p = Point3D::new(1.0, 0.0, 1.0);

    assert_eq!(t * p, Point3D::new(15.0, 0.0, 7.0));
}
