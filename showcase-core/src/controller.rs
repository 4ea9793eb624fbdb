//! Scroll-driven animation of the showcase model.
//!
//! Every frame the controller maps scroll progress onto the model: yaw tracks
//! scroll exactly, horizontal position eases toward a scroll-derived target,
//! and crossing the threshold restyles every material between the normal and
//! wireframe looks. Restyling is edge-triggered: it runs once per crossing,
//! never on frames where the mode is unchanged.

use std::f64::consts::TAU;
use std::time::Duration;

use crate::scene::{Rgb, SceneHost, VisualMode};

/// How the horizontal position eases toward its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Fixed fraction of the remaining distance per frame. Animation speed
    /// therefore depends on the display refresh rate.
    PerTick { factor: f64 },
    /// Fraction derived from elapsed time, `1 - exp(-dt / tau)`, so the
    /// motion is identical at any refresh rate.
    TimeCorrected { tau: Duration },
}

impl Smoothing {
    /// Fraction of the remaining distance to cover this frame
    pub fn factor(&self, dt: Duration) -> f64 {
        match *self {
            Smoothing::PerTick { factor } => factor.clamp(0.0, 1.0),
            Smoothing::TimeCorrected { tau } => {
                if tau.is_zero() {
                    1.0
                } else {
                    1.0 - (-dt.as_secs_f64() / tau.as_secs_f64()).exp()
                }
            }
        }
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::PerTick { factor: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Yaw at the top of the page, in radians
    pub base_rotation_y: f64,
    /// Horizontal position at the top of the page
    pub base_x: f64,
    /// Horizontal distance travelled between top and bottom of the page
    pub span_x: f64,
    /// Progress beyond which the model switches to wireframe
    pub threshold: f64,
    /// Half-width of the band around `threshold` the progress must clear
    /// before the mode flips. Zero means a single crossing value.
    pub hysteresis: f64,
    pub smoothing: Smoothing,
    /// Wireframe line and glow color
    pub active_color: Rgb,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_rotation_y: 4.0,
            base_x: -2.0,
            span_x: 7.0,
            threshold: 0.5,
            hysteresis: 0.0,
            smoothing: Smoothing::default(),
            active_color: Rgb::GREEN,
        }
    }
}

impl ControllerConfig {
    pub fn target_pose(&self, progress: f64) -> TargetPose {
        TargetPose {
            rotation_y: self.base_rotation_y + progress * TAU,
            target_x: self.base_x + progress * self.span_x,
        }
    }

    /// Mode after observing `progress` while in `current`
    pub fn next_mode(&self, current: VisualMode, progress: f64) -> VisualMode {
        match current {
            VisualMode::Normal if progress > self.threshold + self.hysteresis => {
                VisualMode::Wireframe
            }
            VisualMode::Wireframe if progress <= self.threshold - self.hysteresis => {
                VisualMode::Normal
            }
            mode => mode,
        }
    }
}

/// Pose derived from scroll progress alone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPose {
    pub rotation_y: f64,
    pub target_x: f64,
}

/// Per-host state carried between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub current_x: f64,
    pub mode: VisualMode,
}

impl AnimationState {
    pub fn initial(config: &ControllerConfig) -> Self {
        Self {
            current_x: config.base_x,
            mode: VisualMode::Normal,
        }
    }

    pub fn wireframe(&self) -> bool {
        self.mode == VisualMode::Wireframe
    }
}

/// Emitted on the frame the visual mode flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChanged {
    pub from: VisualMode,
    pub to: VisualMode,
}

type ModeListener = Box<dyn FnMut(&ModeChanged)>;

/// Absent or NaN progress reads as the top of the page
pub fn normalize_progress(progress: Option<f64>) -> f64 {
    match progress {
        Some(s) if !s.is_nan() => s.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

pub struct ScrollAnimationController {
    config: ControllerConfig,
    state: Option<AnimationState>,
    listeners: Vec<ModeListener>,
}

impl ScrollAnimationController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: None,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// `None` until a host is attached
    pub fn state(&self) -> Option<&AnimationState> {
        self.state.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_some()
    }

    /// Start a fresh state for a newly attached host
    pub fn attach(&mut self) {
        self.state = Some(AnimationState::initial(&self.config));
    }

    pub fn detach(&mut self) {
        self.state = None;
    }

    /// Observe mode transitions beyond the material restyle
    pub fn on_mode_changed(&mut self, listener: impl FnMut(&ModeChanged) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn target_pose(&self, progress: f64) -> TargetPose {
        self.config.target_pose(progress)
    }

    /// Advance one frame.
    ///
    /// Order within a frame is fixed: rotation, position easing, mode check,
    /// then the material restyle if the mode flipped. Without a host this is
    /// a no-op and the controller stays as it was.
    pub fn tick(
        &mut self,
        progress: Option<f64>,
        host: Option<&mut dyn SceneHost>,
        dt: Duration,
    ) -> Option<ModeChanged> {
        let Some(host) = host else {
            log::trace!("tick before a scene host is attached");
            return None;
        };

        let config = &self.config;
        let progress = normalize_progress(progress);
        let pose = config.target_pose(progress);
        let state = self
            .state
            .get_or_insert_with(|| AnimationState::initial(config));

        host.set_rotation_y(pose.rotation_y as f32);

        state.current_x += (pose.target_x - state.current_x) * config.smoothing.factor(dt);
        host.set_position_x(state.current_x as f32);

        let next = config.next_mode(state.mode, progress);
        if next == state.mode {
            return None;
        }
        let event = ModeChanged {
            from: state.mode,
            to: next,
        };
        state.mode = next;

        let active = config.active_color;
        let report = host.for_each_material(&mut |material| material.apply(next, active));
        if report.skipped > 0 {
            log::trace!("restyle skipped {} nodes without material", report.skipped);
        }
        log::debug!(
            "visual mode {} -> {} at progress {:.3} ({} materials)",
            event.from,
            event.to,
            progress,
            report.visited
        );

        for listener in &mut self.listeners {
            listener(&event);
        }
        Some(event)
    }
}

impl Default for ScrollAnimationController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::scene::{Material, SceneModel, SceneNode, TraversalReport};
    use crate::transform::{Pose, RotationState};
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);

    /// Host that records every mutation it receives
    #[derive(Default)]
    struct RecordingHost {
        position_x: f32,
        rotation: RotationState,
        materials: Vec<Material>,
        restyles: usize,
    }

    impl SceneHost for RecordingHost {
        fn set_position_x(&mut self, x: f32) {
            self.position_x = x;
        }

        fn set_rotation(&mut self, rotation: RotationState) {
            self.rotation = rotation;
        }

        fn rotation(&self) -> RotationState {
            self.rotation
        }

        fn for_each_material(&mut self, f: &mut dyn FnMut(&mut Material)) -> TraversalReport {
            self.restyles += 1;
            self.materials.iter_mut().for_each(|m| f(m));
            TraversalReport {
                visited: self.materials.len(),
                skipped: 0,
            }
        }
    }

    fn host() -> RecordingHost {
        RecordingHost {
            materials: vec![Material::solid(Rgb::GREY); 3],
            ..Default::default()
        }
    }

    fn drive(
        controller: &mut ScrollAnimationController,
        host: &mut RecordingHost,
        progress: &[f64],
    ) -> Vec<(usize, ModeChanged)> {
        progress
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| controller.tick(Some(s), Some(&mut *host), FRAME).map(|e| (i, e)))
            .collect()
    }

    #[test]
    fn rotation_tracks_scroll_exactly() {
        let controller = ScrollAnimationController::default();
        let samples = [0.0, 0.1, 0.25, 0.5, 0.77, 1.0];
        for &s1 in &samples {
            for &s2 in &samples {
                let delta = controller.target_pose(s2).rotation_y - controller.target_pose(s1).rotation_y;
                assert!((delta.abs() - TAU * (s2 - s1).abs()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn rotation_is_written_unsmoothed() {
        let mut controller = ScrollAnimationController::default();
        let mut host = host();
        host.rotation = RotationState::new(0.3, 0.0, 0.1);

        controller.tick(Some(0.25), Some(&mut host), FRAME);
        assert!((host.rotation.y - (4.0 + 0.25 * TAU) as f32).abs() < 1e-5);
        // Other axes belong to the host
        assert_eq!((host.rotation.x, host.rotation.z), (0.3, 0.1));
    }

    #[test]
    fn position_converges_geometrically() {
        let mut controller = ScrollAnimationController::default();
        let mut host = host();
        let target = controller.target_pose(0.8).target_x;
        let epsilon = 1e-9;
        let start_distance = (target - ControllerConfig::default().base_x).abs();
        let bound = ((epsilon / start_distance).ln() / 0.9f64.ln()).ceil() as usize;

        let mut previous = start_distance;
        for _ in 0..bound {
            controller.tick(Some(0.8), Some(&mut host), FRAME);
            let distance = (target - controller.state().unwrap().current_x).abs();
            assert!(distance < previous);
            assert!((distance - previous * 0.9).abs() < 1e-9);
            previous = distance;
        }
        assert!(previous < epsilon);
        assert!((host.position_x as f64 - target).abs() < 1e-5);
    }

    #[test]
    fn single_crossing_emits_one_event() {
        let mut controller = ScrollAnimationController::default();
        let mut host = host();
        let events = drive(&mut controller, &mut host, &[0.3, 0.4, 0.6, 0.7]);

        assert_eq!(
            events,
            vec![(
                2,
                ModeChanged {
                    from: VisualMode::Normal,
                    to: VisualMode::Wireframe
                }
            )]
        );
        assert_eq!(host.restyles, 1);
        assert!(host.materials.iter().all(|m| m.wireframe && m.emissive == Some(Rgb::GREEN)));
    }

    #[test]
    fn half_way_is_still_normal() {
        let mut controller = ScrollAnimationController::default();
        let mut host = host();
        assert!(drive(&mut controller, &mut host, &[0.5, 0.5]).is_empty());
        assert!(!controller.state().unwrap().wireframe());

        // and from wireframe, exactly half way switches back
        drive(&mut controller, &mut host, &[0.6]);
        let events = drive(&mut controller, &mut host, &[0.5]);
        assert_eq!(events[0].1.to, VisualMode::Normal);
        assert!(host.materials.iter().all(|m| *m == Material::solid(Rgb::GREY)));
    }

    #[test]
    fn repeated_progress_restyles_once() {
        let mut controller = ScrollAnimationController::default();
        let mut host = host();
        assert!(controller.tick(Some(0.7), Some(&mut host), FRAME).is_some());
        assert!(controller.tick(Some(0.7), Some(&mut host), FRAME).is_none());
        assert_eq!(host.restyles, 1);
    }

    #[test]
    fn missing_host_is_a_noop() {
        let mut controller = ScrollAnimationController::default();
        for s in [0.0, 0.7, 1.0, f64::NAN] {
            assert!(controller.tick(Some(s), None, FRAME).is_none());
        }
        assert!(!controller.is_attached());

        let mut host = host();
        controller.tick(Some(0.2), Some(&mut host), FRAME);
        let before = *controller.state().unwrap();
        controller.tick(Some(0.9), None, FRAME);
        assert_eq!(*controller.state().unwrap(), before);
    }

    #[test]
    fn unavailable_progress_reads_as_top() {
        assert_eq!(normalize_progress(None), 0.0);
        assert_eq!(normalize_progress(Some(f64::NAN)), 0.0);
        assert_eq!(normalize_progress(Some(-0.5)), 0.0);
        assert_eq!(normalize_progress(Some(1.5)), 1.0);
    }

    #[test]
    fn listeners_see_every_transition() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut controller = ScrollAnimationController::default();
        let sink = Rc::clone(&seen);
        controller.on_mode_changed(move |event| sink.borrow_mut().push(event.to));

        let mut host = host();
        drive(&mut controller, &mut host, &[0.2, 0.9, 0.9, 0.1, 0.6]);
        assert_eq!(
            *seen.borrow(),
            vec![VisualMode::Wireframe, VisualMode::Normal, VisualMode::Wireframe]
        );
    }

    #[test]
    fn hysteresis_band_suppresses_jitter() {
        let mut controller = ScrollAnimationController::new(ControllerConfig {
            hysteresis: 0.05,
            ..Default::default()
        });
        let mut host = host();
        let events = drive(&mut controller, &mut host, &[0.52, 0.48, 0.54, 0.56, 0.47, 0.44]);
        let modes: Vec<_> = events.iter().map(|(i, e)| (*i, e.to)).collect();
        assert_eq!(modes, vec![(3, VisualMode::Wireframe), (5, VisualMode::Normal)]);
    }

    #[test]
    fn time_corrected_smoothing_ignores_frame_rate() {
        let config = |tau| ControllerConfig {
            smoothing: Smoothing::TimeCorrected { tau },
            ..Default::default()
        };
        let tau = Duration::from_millis(150);
        let mut slow = ScrollAnimationController::new(config(tau));
        let mut fast = ScrollAnimationController::new(config(tau));
        let (mut a, mut b) = (host(), host());

        for _ in 0..30 {
            slow.tick(Some(1.0), Some(&mut a), Duration::from_millis(32));
            fast.tick(Some(1.0), Some(&mut b), Duration::from_millis(16));
            fast.tick(Some(1.0), Some(&mut b), Duration::from_millis(16));
        }
        let slow_x = slow.state().unwrap().current_x;
        let fast_x = fast.state().unwrap().current_x;
        assert!((slow_x - fast_x).abs() < 1e-9);
    }

    #[test]
    fn zero_tau_snaps() {
        let smoothing = Smoothing::TimeCorrected {
            tau: Duration::ZERO,
        };
        assert_eq!(smoothing.factor(FRAME), 1.0);
    }

    #[test]
    fn drives_a_scene_model_and_skips_group_nodes() {
        let mut controller = ScrollAnimationController::default();
        let mut model = SceneModel::new(
            SceneNode::group(
                "truck",
                vec![SceneNode::mesh("body", Mesh::cube(1.0), Material::solid(Rgb::GREY))],
            ),
            Pose::default(),
        );

        let event = controller.tick(Some(0.9), Some(&mut model), FRAME);
        assert_eq!(event.map(|e| e.to), Some(VisualMode::Wireframe));
        let (_, material) = model.drawables()[0];
        assert!(material.wireframe);
        assert_eq!(material.color, Rgb::GREEN);
    }

    #[test]
    fn detach_discards_state() {
        let mut controller = ScrollAnimationController::default();
        let mut host = host();
        controller.tick(Some(0.9), Some(&mut host), FRAME);
        controller.detach();
        assert!(controller.state().is_none());

        controller.attach();
        assert_eq!(
            controller.state(),
            Some(&AnimationState::initial(controller.config()))
        );
    }
}
