//! Showcase Core - scroll-driven product showcase logic
//!
//! Engine-agnostic pieces shared by every host: geometry and STL loading,
//! transforms and the camera, scroll progress, and the controller that maps
//! scroll onto the showcased model. Hosts own the frame loop and the pixels.

pub mod asset;
pub mod controller;
pub mod fallback;
pub mod geometry;
pub mod motion;
pub mod projection;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use asset::{AssetError, AssetHandle, AssetLoader, AssetStatus};
pub use controller::{
    AnimationState, ControllerConfig, ModeChanged, ScrollAnimationController, Smoothing,
    TargetPose,
};
pub use fallback::FallbackSpin;
pub use geometry::{Bounds, Mesh, Triangle, Vertex};
pub use motion::FloatMotion;
pub use projection::Camera;
pub use scene::{Material, Rgb, SceneHost, SceneModel, SceneNode, TraversalReport, VisualMode};
pub use scroll::ScrollState;
pub use stage::Showcase;
pub use stl::StlError;
pub use transform::{Pose, RotationState, Transform};
