use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Homogeneous 3D vector.
///
/// `w` is 1 for affine points and only takes another value as the
/// intermediate result of a projective [`Vector::transform`]. Every operation
/// returns a fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default = "unit_w")]
    pub w: f64,
}

fn unit_w() -> f64 {
    1.0
}

impl Vector {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Affine point with `w = 1`.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const fn with_w(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Multiply x, y and z by `k`. The result carries the default `w`.
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    /// Row vector times matrix: `result_i = Σ_j v_j · m[j * 4 + i]`.
    ///
    /// This is the convention the clip matrix is authored for; swapping in
    /// the column-vector form silently mirrors the projection.
    pub fn transform(self, m: &Matrix) -> Self {
        let d = &m.data;
        Self::with_w(
            self.x * d[0] + self.y * d[4] + self.z * d[8] + self.w * d[12],
            self.x * d[1] + self.y * d[5] + self.z * d[9] + self.w * d[13],
            self.x * d[2] + self.y * d[6] + self.z * d[10] + self.w * d[14],
            self.x * d[3] + self.y * d[7] + self.z * d[11] + self.w * d[15],
        )
    }

    /// Component-wise sum of x, y and z. `w` is not carried.
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference of x, y and z. `w` is not carried.
    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn negate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Euclidean distance over x, y and z.
    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.subtract(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.negate()
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, k: f64) -> Vector {
        self.scale(k)
    }
}

/// 4x4 transform stored as 16 numbers in row-major order (`data[row * 4 + col]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub data: [f64; 16],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub const fn from_array(data: [f64; 16]) -> Self {
        Self { data }
    }

    pub const fn zero() -> Self {
        Self { data: [0.0; 16] }
    }

    pub const fn identity() -> Self {
        let mut data = [0.0; 16];
        data[0] = 1.0;
        data[5] = 1.0;
        data[10] = 1.0;
        data[15] = 1.0;
        Self { data }
    }

    /// Rotation about the x axis (camera pitch).
    pub fn rotation_x(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut m = Self::identity();
        m.data[5] = cos;
        m.data[6] = -sin;
        m.data[9] = sin;
        m.data[10] = cos;
        m
    }

    /// Perspective clip matrix for row vectors.
    ///
    /// After [`Vector::transform`] the `w` component equals the view-space
    /// depth and is used directly as the perspective divisor.
    pub fn clip(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov * 0.5).tan();
        let mut m = Self::identity();
        m.data[0] = f / aspect;
        m.data[5] = f;
        m.data[10] = far / (far - near);
        m.data[11] = 1.0;
        m.data[14] = -((far * near) / (far - near));
        m.data[15] = 0.0;
        m
    }

    /// Matrix product in the row-vector convention.
    ///
    /// Transforming by `a.multiply(&b)` is the same as transforming by `b`
    /// and then by `a`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let mut result = Matrix::zero();
        for y in 0..4 {
            let col = y * 4;
            for x in 0..4 {
                for i in 0..4 {
                    result.data[x + col] += other.data[i + col] * self.data[x + i * 4];
                }
            }
        }
        result
    }

    /// Largest absolute element-wise difference, for tolerance checks.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}
