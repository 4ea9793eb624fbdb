//! Ambient floating motion layered over the scroll-driven pose.

use std::time::Duration;

use nalgebra::Vector3;

use crate::transform::{Pose, RotationState};

/// A slow bob and sway, sampled from elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatMotion {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    /// Vertical range the bob is mapped onto, before `float_intensity`
    pub range: (f32, f32),
}

impl Default for FloatMotion {
    fn default() -> Self {
        Self {
            speed: 2.0,
            rotation_intensity: 0.2,
            float_intensity: 0.5,
            range: (-0.1, 0.1),
        }
    }
}

impl FloatMotion {
    /// Group transform at `elapsed` since the stage started
    pub fn sample(&self, elapsed: Duration) -> Pose {
        let t = elapsed.as_secs_f32() / 4.0 * self.speed;
        let rotation = RotationState::new(
            t.cos() / 8.0 * self.rotation_intensity,
            t.sin() / 8.0 * self.rotation_intensity,
            t.sin() / 20.0 * self.rotation_intensity,
        );
        let bob = map_linear(t.sin() / 10.0, (-0.1, 0.1), self.range);
        Pose::new(Vector3::new(0.0, bob * self.float_intensity, 0.0), rotation, 1.0)
    }
}

fn map_linear(x: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    to.0 + (x - from.0) / (from.1 - from.0) * (to.1 - to.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_pose_at_start() {
        let pose = FloatMotion::default().sample(Duration::ZERO);
        assert!((pose.rotation.x - 0.2 / 8.0).abs() < 1e-6);
        assert_eq!(pose.rotation.y, 0.0);
        assert!(pose.position.y.abs() < 1e-6);
    }

    #[test]
    fn test_map_linear() {
        assert!(map_linear(0.0, (-0.1, 0.1), (-0.1, 0.1)).abs() < 1e-6);
        assert!((map_linear(0.1, (-0.1, 0.1), (0.0, 1.0)) - 1.0).abs() < 1e-6);
        assert!((map_linear(-0.05, (-0.1, 0.1), (0.0, 2.0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bob_stays_in_range() {
        let motion = FloatMotion::default();
        for ms in (0..20_000).step_by(37) {
            let pose = motion.sample(Duration::from_millis(ms));
            assert!(pose.position.y.abs() <= 0.1 * motion.float_intensity + 1e-6);
            assert!(pose.rotation.y.abs() <= motion.rotation_intensity / 8.0 + 1e-6);
        }
    }

    #[test]
    fn test_custom_range_shifts_bob() {
        let motion = FloatMotion {
            range: (0.0, 1.0),
            float_intensity: 1.0,
            ..Default::default()
        };
        assert!((motion.sample(Duration::ZERO).position.y - 0.5).abs() < 1e-6);
    }
}
