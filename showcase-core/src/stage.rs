//! The stage: which model is on screen and what drives it.
//!
//! The placeholder box is shown and spun until the real model resolves. The
//! swap happens between frames, and the incoming model starts from a fresh
//! animation state; its materials are unstyled on arrival, so a preserved
//! wireframe flag would never restyle them.

use std::time::Duration;

use crate::asset::{AssetHandle, AssetStatus};
use crate::controller::{ControllerConfig, ModeChanged, ScrollAnimationController};
use crate::fallback::FallbackSpin;
use crate::motion::FloatMotion;
use crate::scene::{SceneModel, VisualMode};
use crate::transform::Pose;

pub struct Showcase {
    placeholder: SceneModel,
    primary: Option<SceneModel>,
    controller: ScrollAnimationController,
    fallback: FallbackSpin,
    float: Option<FloatMotion>,
    elapsed: Duration,
    asset_status: AssetStatus,
}

impl Showcase {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            placeholder: SceneModel::placeholder(),
            primary: None,
            controller: ScrollAnimationController::new(config),
            fallback: FallbackSpin,
            float: Some(FloatMotion::default()),
            elapsed: Duration::ZERO,
            asset_status: AssetStatus::Pending,
        }
    }

    /// Replace or disable the ambient float
    pub fn with_float(mut self, float: Option<FloatMotion>) -> Self {
        self.float = float;
        self
    }

    pub fn controller(&self) -> &ScrollAnimationController {
        &self.controller
    }

    /// For registering mode listeners
    pub fn controller_mut(&mut self) -> &mut ScrollAnimationController {
        &mut self.controller
    }

    /// Check a pending load and swap the model in if it finished.
    /// Call between frames, never from inside one.
    pub fn poll_assets(&mut self, handle: &mut AssetHandle) -> AssetStatus {
        match handle.try_resolve() {
            Some(Ok(model)) => self.swap_in(model),
            Some(Err(_)) => self.asset_status = AssetStatus::Failed,
            None => {}
        }
        self.asset_status
    }

    /// Make `model` the driven host, with a fresh animation state
    pub fn swap_in(&mut self, model: SceneModel) {
        log::debug!("swapping placeholder for '{}'", model.root.name);
        self.primary = Some(model);
        self.controller.attach();
        self.asset_status = AssetStatus::Ready;
    }

    /// Drive the active model for one frame
    pub fn frame(&mut self, progress: Option<f64>, dt: Duration) -> Option<ModeChanged> {
        self.elapsed += dt;
        match &mut self.primary {
            Some(model) => self.controller.tick(progress, Some(model), dt),
            None => {
                self.fallback.tick(progress, Some(&mut self.placeholder));
                None
            }
        }
    }

    pub fn active_model(&self) -> &SceneModel {
        self.primary.as_ref().unwrap_or(&self.placeholder)
    }

    pub fn is_fallback(&self) -> bool {
        self.primary.is_none()
    }

    pub fn asset_status(&self) -> AssetStatus {
        self.asset_status
    }

    pub fn mode(&self) -> VisualMode {
        self.controller
            .state()
            .map(|state| state.mode)
            .unwrap_or_default()
    }

    /// Transform of the group the active model sits in
    pub fn group_pose(&self) -> Pose {
        self.float
            .map(|float| float.sample(self.elapsed))
            .unwrap_or_default()
    }
}

impl Default for Showcase {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
