//! Placeholder animation while the real model is unavailable.

use std::f32::consts::PI;

use crate::controller::normalize_progress;
use crate::scene::SceneHost;
use crate::transform::RotationState;

/// Tumbles the placeholder with scroll: half a turn about X and a full turn
/// about Y over the page. No easing, no restyling.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSpin;

impl FallbackSpin {
    pub fn rotation(progress: f64) -> RotationState {
        let s = normalize_progress(Some(progress)) as f32;
        RotationState::new(s * PI, s * 2.0 * PI, 0.0)
    }

    pub fn tick(&self, progress: Option<f64>, host: Option<&mut dyn SceneHost>) {
        if let Some(host) = host {
            host.set_rotation(Self::rotation(progress.unwrap_or(0.0)));
        }
    }
}
