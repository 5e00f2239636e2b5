//! Exponential-map rotations.
//!
//! A rotation is parameterized by `p = θ·axis`. The map is converted to a unit
//! quaternion `q = (cos(θ/2), sin(θ/2)/θ · p)` and from there to a rotation
//! matrix. The partial derivatives of the matrix with respect to the three
//! exponential-map coordinates follow Grassia, "Practical Parameterization of
//! Rotations Using the Exponential Map" (1998): below a small angle the
//! factor `sin(θ/2)/θ` and its derivative are replaced by their Taylor
//! expansions, so the identity and its neighbourhood never divide by `θ`.

use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};

/// Angle below which Taylor expansions replace the closed forms.
const SMALL_ANGLE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation3 {
    exp_map: Vector3<f64>,
    /// Scalar part of the unit quaternion.
    w: f64,
    /// Vector part of the unit quaternion.
    v: Vector3<f64>,
    /// `sin(θ/2)/θ`.
    half_sinc: f64,
    /// `(d/dθ sin(θ/2)/θ) / θ`.
    half_sinc_slope: f64,
}

impl Rotation3 {
    pub fn identity() -> Self {
        Self::from_exp_map(Vector3::zeros())
    }

    pub fn from_exp_map(exp_map: Vector3<f64>) -> Self {
        let theta = exp_map.norm();
        let half = 0.5 * theta;

        let (half_sinc, half_sinc_slope) = if theta < SMALL_ANGLE {
            let theta2 = theta * theta;
            (0.5 - theta2 / 48.0, -1.0 / 24.0 + theta2 / 960.0)
        } else {
            let sinc = half.sin() / theta;
            (sinc, (0.5 * half.cos() - sinc) / (theta * theta))
        };

        Self {
            exp_map,
            w: half.cos(),
            v: exp_map * half_sinc,
            half_sinc,
            half_sinc_slope,
        }
    }

    /// Recovers the exponential map of a unit quaternion, choosing the
    /// representative with rotation angle in `[0, π]`.
    pub fn from_quaternion(q: &UnitQuaternion<f64>) -> Self {
        let (mut w, mut v) = (q.w, q.imag());
        if w < 0.0 {
            w = -w;
            v = -v;
        }
        let sin_half = v.norm();
        let exp_map = if sin_half < SMALL_ANGLE {
            v * 2.0
        } else {
            v * (2.0 * sin_half.atan2(w) / sin_half)
        };
        Self::from_exp_map(exp_map)
    }

    pub fn exp_map(&self) -> Vector3<f64> {
        self.exp_map
    }

    pub fn angle(&self) -> f64 {
        self.exp_map.norm()
    }

    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::new_unchecked(Quaternion::new(self.w, self.v.x, self.v.y, self.v.z))
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        let (w, x, y, z) = (self.w, self.v.x, self.v.y, self.v.z);
        Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        )
    }

    #[inline]
    pub fn rotate(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix() * vector
    }

    /// The three matrices `∂R/∂p_i` for `i = 0, 1, 2`.
    pub fn derivatives(&self) -> [Matrix3<f64>; 3] {
        let (w, x, y, z) = (self.w, self.v.x, self.v.y, self.v.z);

        let dr_dw = Matrix3::new(
            0.0,
            -2.0 * z,
            2.0 * y,
            2.0 * z,
            0.0,
            -2.0 * x,
            -2.0 * y,
            2.0 * x,
            0.0,
        );
        let dr_dx = Matrix3::new(
            0.0,
            2.0 * y,
            2.0 * z,
            2.0 * y,
            -4.0 * x,
            -2.0 * w,
            2.0 * z,
            2.0 * w,
            -4.0 * x,
        );
        let dr_dy = Matrix3::new(
            -4.0 * y,
            2.0 * x,
            2.0 * w,
            2.0 * x,
            0.0,
            2.0 * z,
            -2.0 * w,
            2.0 * z,
            -4.0 * y,
        );
        let dr_dz = Matrix3::new(
            -4.0 * z,
            -2.0 * w,
            2.0 * x,
            2.0 * w,
            -4.0 * z,
            2.0 * y,
            2.0 * x,
            2.0 * y,
            0.0,
        );

        let p = self.exp_map;
        std::array::from_fn(|i| {
            let dw = -0.5 * self.half_sinc * p[i];
            let dv = Vector3::ith(i, self.half_sinc) + p * (self.half_sinc_slope * p[i]);
            dr_dw * dw + dr_dx * dv.x + dr_dy * dv.y + dr_dz * dv.z
        })
    }
}

impl Default for Rotation3 {
    fn default() -> Self {
        Self::identity()
    }
}
