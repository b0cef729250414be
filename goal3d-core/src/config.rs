//! Named dimensions of the goal and the scene-level configuration
//!
//! Every placement in the assembler is derived from [`GoalDimensions`], so
//! changing one field rescales the whole goal consistently.

use crate::error::{Result, SceneError};

/// Base constants of the goal frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalDimensions {
    /// Radius of crossbar, posts and supports
    pub skeleton_radius: f32,
    pub crossbar_length: f32,
    /// Slant of the back supports away from vertical, in degrees
    pub support_angle_degrees: f32,
}

impl Default for GoalDimensions {
    fn default() -> Self {
        Self {
            skeleton_radius: 0.05,
            crossbar_length: 3.0,
            support_angle_degrees: 35.0,
        }
    }
}

impl GoalDimensions {
    pub fn post_length(&self) -> f32 {
        self.crossbar_length / 3.0
    }

    pub fn support_angle(&self) -> f32 {
        self.support_angle_degrees.to_radians()
    }

    /// Slant length of a back support (and height of the back net)
    pub fn support_length(&self) -> f32 {
        self.post_length() / self.support_angle().cos()
    }

    /// Z offset of the support center behind the goal line
    pub fn support_z_offset(&self) -> f32 {
        -self.post_length() / 2.0 * self.support_angle().tan()
    }

    /// Z where a back support meets the ground
    pub fn support_ground_z(&self) -> f32 {
        2.0 * self.support_z_offset()
    }

    pub fn torus_radius(&self) -> f32 {
        self.skeleton_radius * 1.25
    }

    pub fn torus_tube(&self) -> f32 {
        self.skeleton_radius * 0.75
    }

    pub fn ball_radius(&self) -> f32 {
        self.post_length() / 16.0
    }

    pub fn flag_post_radius(&self) -> f32 {
        self.skeleton_radius / 2.0
    }

    pub fn flag_post_length(&self) -> f32 {
        self.post_length() * 1.5
    }

    pub fn flag_width(&self) -> f32 {
        self.crossbar_length / 6.0
    }

    pub fn flag_height(&self) -> f32 {
        self.post_length() / 4.0
    }

    /// Distance of each flag post outside its crossbar end
    pub fn flag_offset(&self) -> f32 {
        self.flag_width() / 2.0 + self.flag_post_radius()
    }

    pub fn validate(&self) -> Result<()> {
        positive("skeleton radius", self.skeleton_radius)?;
        positive("crossbar length", self.crossbar_length)?;
        let angle = self.support_angle_degrees;
        if !(angle.is_finite() && angle > 0.0 && angle < 90.0) {
            return Err(SceneError::InvalidDimension {
                what: "support angle (degrees, 0..90 exclusive)",
                value: angle,
            });
        }
        if self.skeleton_radius * 2.0 >= self.post_length() {
            return Err(SceneError::InvalidDimension {
                what: "skeleton radius (must be thinner than half a post)",
                value: self.skeleton_radius,
            });
        }
        Ok(())
    }
}

/// Everything the assembler needs to lay out the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalConfig {
    pub dimensions: GoalDimensions,
    /// Ball height below the crossbar, as a fraction of the post length
    pub ball_height_factor: f32,
    /// Ball distance in front of the goal line, as a fraction of the crossbar length
    pub ball_depth_factor: f32,
    /// Build the two corner flags
    pub flags: bool,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            dimensions: GoalDimensions::default(),
            ball_height_factor: 0.5,
            ball_depth_factor: 0.25,
            flags: true,
        }
    }
}

impl GoalConfig {
    pub fn validate(&self) -> Result<()> {
        self.dimensions.validate()?;
        let height = self.ball_height_factor;
        if !(height.is_finite() && (0.0..=1.0).contains(&height)) {
            return Err(SceneError::InvalidDimension {
                what: "ball height factor (0..=1)",
                value: height,
            });
        }
        if !self.ball_depth_factor.is_finite() {
            return Err(SceneError::InvalidDimension {
                what: "ball depth factor",
                value: self.ball_depth_factor,
            });
        }
        Ok(())
    }

    /// Ball center relative to the scene root
    pub fn ball_position(&self) -> (f32, f32, f32) {
        let d = &self.dimensions;
        (
            0.0,
            -d.post_length() * self.ball_height_factor,
            d.crossbar_length * self.ball_depth_factor,
        )
    }
}

fn positive(what: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidDimension { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let d = GoalDimensions::default();
        assert!((d.post_length() - 1.0).abs() < 1e-6);
        assert!((d.ball_radius() - 1.0 / 16.0).abs() < 1e-6);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_support_right_triangle() {
        for angle in [20.0f32, 35.0, 45.0, 60.0] {
            let d = GoalDimensions {
                support_angle_degrees: angle,
                ..Default::default()
            };
            let p = d.post_length();
            let a = angle.to_radians();
            assert!((d.support_z_offset() - (-p / 2.0 * a.tan())).abs() < 1e-6);
            assert!((d.support_length() - p / a.cos()).abs() < 1e-6);

            let half_slant = d.support_length() / 2.0;
            let z = d.support_z_offset();
            assert!(((p / 2.0).powi(2) + z * z - half_slant * half_slant).abs() < 1e-5);
        }
    }

    #[test]
    fn test_invalid_angles_rejected() {
        for angle in [0.0, 90.0, -10.0, f32::NAN] {
            let d = GoalDimensions {
                support_angle_degrees: angle,
                ..Default::default()
            };
            assert!(d.validate().is_err(), "angle {}", angle);
        }
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        let d = GoalDimensions {
            crossbar_length: -3.0,
            ..Default::default()
        };
        assert!(matches!(
            d.validate(),
            Err(SceneError::InvalidDimension { what: "crossbar length", .. })
        ));

        let config = GoalConfig {
            ball_height_factor: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ball_position_scales_with_goal() {
        let mut config = GoalConfig::default();
        assert_eq!(config.ball_position(), (0.0, -0.5, 0.75));
        config.dimensions.crossbar_length = 6.0;
        let (_, y, z) = config.ball_position();
        assert!((y + 1.0).abs() < 1e-6);
        assert!((z - 1.5).abs() < 1e-6);
    }
}
