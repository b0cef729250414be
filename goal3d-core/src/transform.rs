/// Homogeneous transform builders and composition
use nalgebra::Matrix4;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SceneError};

/// Coordinate axis for elementary rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl TryFrom<char> for Axis {
    type Error = SceneError;

    fn try_from(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'x' => Ok(Axis::X),
            'y' => Ok(Axis::Y),
            'z' => Ok(Axis::Z),
            other => Err(SceneError::InvalidAxis(other.to_string())),
        }
    }
}

impl FromStr for Axis {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Axis::try_from(c).map_err(|_| SceneError::InvalidAxis(s.to_string()))
            }
            _ => Err(SceneError::InvalidAxis(s.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Transform builder for 3D transformations
///
/// Every builder returns a fresh matrix; nothing here mutates a node.
/// Matrices are written row-major, translation in the last column.
pub struct Transform;

impl Transform {
    /// Elementary rotation about one axis, angle in degrees
    #[rustfmt::skip]
    pub fn rotation(angle_degrees: f32, axis: Axis) -> Matrix4<f32> {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        match axis {
            Axis::X => Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, c, -s, 0.0,
                0.0, s, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            Axis::Y => Matrix4::new(
                c, 0.0, s, 0.0,
                0.0, 1.0, 0.0, 0.0,
                -s, 0.0, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
            Axis::Z => Matrix4::new(
                c, -s, 0.0, 0.0,
                s, c, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Rotation with the axis given as text ("x", "y" or "z")
    pub fn rotation_named(angle_degrees: f32, axis: &str) -> Result<Matrix4<f32>> {
        let axis: Axis = axis.parse()?;
        Ok(Self::rotation(angle_degrees, axis))
    }

    /// Create a translation matrix
    #[rustfmt::skip]
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a uniform scale matrix
    #[rustfmt::skip]
    pub fn uniform_scale(factor: f32) -> Matrix4<f32> {
        Matrix4::new(
            factor, 0.0, 0.0, 0.0,
            0.0, factor, 0.0, 0.0,
            0.0, 0.0, factor, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Matrix product `a * b`: `b` acts first on a point, then `a`
    pub fn compose(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
        a * b
    }

    /// Apply `steps` in order: the first entry acts first.
    ///
    /// `sequence(&[r, t])` is `t * r`, i.e. rotate in place then move.
    pub fn sequence(steps: &[Matrix4<f32>]) -> Matrix4<f32> {
        steps
            .iter()
            .fold(Matrix4::identity(), |acc, step| Self::compose(step, &acc))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    const AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn is_identity(m: &Matrix4<f32>) -> bool {
        (m - Matrix4::identity()).norm() < 1e-5
    }

    #[test]
    fn test_rotation_inverse_is_identity() {
        for axis in AXES {
            for angle in [-270.0, -90.0, -35.0, 0.0, 2.0, 45.0, 123.4, 360.0] {
                let m = Transform::compose(
                    &Transform::rotation(angle, axis),
                    &Transform::rotation(-angle, axis),
                );
                assert!(is_identity(&m), "axis {} angle {}", axis, angle);
            }
        }
    }

    #[test]
    fn test_translation_inverse_is_identity() {
        let m = Transform::compose(
            &Transform::translation(1.5, -0.5, 2.25),
            &Transform::translation(-1.5, 0.5, -2.25),
        );
        assert!(is_identity(&m));
    }

    #[test]
    fn test_translation_layout() {
        let m = Transform::translation(1.0, 2.0, 3.0);
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[(1, 3)], 2.0);
        assert_eq!(m[(2, 3)], 3.0);
        assert_eq!(m.row(3).transpose(), nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(m.fixed_view::<3, 3>(0, 0).into_owned(), nalgebra::Matrix3::identity());
    }

    #[test]
    fn test_rotation_z_turns_y_into_minus_x() {
        let m = Transform::rotation(90.0, Axis::Z);
        let v = m.transform_vector(&Vector3::new(0.0, 1.0, 0.0));
        assert!((v - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_matches_nalgebra() {
        let units = [Vector3::x_axis(), Vector3::y_axis(), Vector3::z_axis()];
        for (axis, unit) in AXES.iter().zip(units) {
            let ours = Transform::rotation(30.0, *axis);
            let theirs = Matrix4::from_axis_angle(&unit, 30f32.to_radians());
            assert!((ours - theirs).norm() < 1e-6);
        }
    }

    #[test]
    fn test_sequence_order_matters() {
        let r = Transform::rotation(90.0, Axis::Z);
        let t = Transform::translation(1.0, 0.0, 0.0);
        let rotate_then_move = Transform::sequence(&[r, t]);
        let move_then_rotate = Transform::sequence(&[t, r]);

        let p = rotate_then_move.transform_point(&Point3::origin());
        assert!((p - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-6);

        let p = move_then_rotate.transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_named_rotation_rejects_unknown_axis() {
        assert_eq!(
            Transform::rotation_named(10.0, "w"),
            Err(SceneError::InvalidAxis("w".to_string()))
        );
        assert!(Transform::rotation_named(10.0, "xy").is_err());
        assert!(Transform::rotation_named(10.0, "").is_err());
        assert!(Transform::rotation_named(10.0, "Y").is_ok());
    }

    #[test]
    fn test_uniform_scale() {
        let m = Transform::uniform_scale(0.95);
        let p = m.transform_point(&Point3::new(2.0, 0.0, -1.0));
        assert!((p - Point3::new(1.9, 0.0, -0.95)).norm() < 1e-6);
    }
}
