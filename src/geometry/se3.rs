//! Rigid-body pose used for sensor poses and descriptor anchors.

use std::ops::Mul;

use nalgebra::{Quaternion, SVector, UnitQuaternion, Vector3};

/// 7-element pose vector `[x, y, z, qw, qx, qy, qz]`.
pub type Pose7 = SVector<f64, 7>;

/// Rigid transform T_wc (sensor to world).
#[derive(Debug, Clone, PartialEq)]
pub struct SE3 {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl SE3 {
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Inverse transform (T_cw from T_wc).
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        let translation = -(rotation * self.translation);
        Self {
            rotation,
            translation,
        }
    }

    /// Apply this transform to a point.
    pub fn transform_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * p + self.translation
    }

    /// Position followed by the quaternion in `w, x, y, z` order.
    pub fn to_vec7(&self) -> Pose7 {
        let q = self.rotation.quaternion();
        Pose7::from_column_slice(&[
            self.translation.x,
            self.translation.y,
            self.translation.z,
            q.w,
            q.i,
            q.j,
            q.k,
        ])
    }

    /// Inverse of [`SE3::to_vec7`]. The quaternion part is renormalized.
    pub fn from_vec7(v: &Pose7) -> Self {
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(v[3], v[4], v[5], v[6]));
        Self {
            rotation,
            translation: Vector3::new(v[0], v[1], v[2]),
        }
    }
}

impl Default for SE3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<&SE3> for &SE3 {
    type Output = SE3;

    fn mul(self, rhs: &SE3) -> SE3 {
        SE3 {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_pose() -> SE3 {
        SE3::new(
            UnitQuaternion::from_euler_angles(0.1, -0.2, 0.3),
            Vector3::new(1.0, 2.0, 3.0),
        )
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let pose = sample_pose();
        let id = &pose * &pose.inverse();

        assert_relative_eq!(id.translation, Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(id.rotation.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_point_roundtrip() {
        let pose = sample_pose();
        let p = Vector3::new(-0.5, 0.25, 4.0);
        let back = pose.inverse().transform_point(&pose.transform_point(&p));

        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_vec7_layout() {
        let pose = SE3::new(UnitQuaternion::identity(), Vector3::new(1.0, 2.0, 3.0));
        let v = pose.to_vec7();

        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(SE3::from_vec7(&v), pose);
    }
}
