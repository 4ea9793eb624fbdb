//! Scene models the showcase drives: nodes, materials and the host capability.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::geometry::Mesh;
use crate::transform::{Pose, RotationState};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0x00, 0xff, 0x00);
    pub const ORANGE: Rgb = Rgb(0xff, 0xa5, 0x00);
    pub const GREY: Rgb = Rgb(0xb4, 0xb4, 0xb4);

    /// Scale every channel, saturating at 255
    pub fn scaled(self, factor: f32) -> Rgb {
        let channel = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Rgb(channel(self.0), channel(self.1), channel(self.2))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseRgbError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseRgbError(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// How a model's materials are styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualMode {
    #[default]
    Normal,
    Wireframe,
}

impl VisualMode {
    pub fn name(&self) -> &'static str {
        match self {
            VisualMode::Normal => "normal",
            VisualMode::Wireframe => "wireframe",
        }
    }
}

impl fmt::Display for VisualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Surface attributes of a mesh node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub wireframe: bool,
    pub color: Rgb,
    /// Color the model was loaded with, restored when leaving wireframe mode
    pub base_color: Rgb,
    pub emissive: Option<Rgb>,
}

impl Material {
    pub fn solid(color: Rgb) -> Self {
        Self {
            wireframe: false,
            color,
            base_color: color,
            emissive: None,
        }
    }

    pub fn wireframe(color: Rgb) -> Self {
        Self {
            wireframe: true,
            ..Self::solid(color)
        }
    }

    /// Restyle for a visual mode. Wireframe glows in `active`.
    pub fn apply(&mut self, mode: VisualMode, active: Rgb) {
        match mode {
            VisualMode::Wireframe => {
                self.wireframe = true;
                self.color = active;
                self.emissive = Some(active);
            }
            VisualMode::Normal => {
                self.wireframe = false;
                self.color = self.base_color;
                self.emissive = None;
            }
        }
    }
}

/// A node in a model's hierarchy. Group nodes carry neither mesh nor material.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: String,
    pub mesh: Option<Mesh>,
    pub material: Option<Material>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self {
            name: name.into(),
            children,
            ..Default::default()
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            material: Some(material),
            children: Vec::new(),
        }
    }

    /// Depth-first, parents before children
    pub fn traverse<'a>(&'a self, f: &mut dyn FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.traverse(f);
        }
    }

    pub fn traverse_mut(&mut self, f: &mut dyn FnMut(&mut SceneNode)) {
        f(self);
        for child in &mut self.children {
            child.traverse_mut(f);
        }
    }
}

/// Outcome of a material traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalReport {
    pub visited: usize,
    /// Nodes that had no mesh or no material
    pub skipped: usize,
}

/// The capability a driver is handed each frame: the object's pose and the
/// exact set of materials it may restyle. Nothing else in the scene is reachable.
pub trait SceneHost {
    fn set_position_x(&mut self, x: f32);

    fn set_rotation(&mut self, rotation: RotationState);

    fn rotation(&self) -> RotationState;

    fn set_rotation_y(&mut self, radians: f32) {
        let mut rotation = self.rotation();
        rotation.y = radians;
        self.set_rotation(rotation);
    }

    /// Visit every mesh material. Nodes lacking one are skipped and counted.
    fn for_each_material(&mut self, f: &mut dyn FnMut(&mut Material)) -> TraversalReport;
}

/// A loaded or placeholder model: a node tree placed in the world by a pose
#[derive(Debug, Clone)]
pub struct SceneModel {
    pub root: SceneNode,
    pub pose: Pose,
}

impl SceneModel {
    pub fn new(root: SceneNode, pose: Pose) -> Self {
        Self { root, pose }
    }

    /// Wrap a loaded mesh: fitted to a unit box, doubled in scale, placed
    /// at the left of the stage with its initial yaw.
    pub fn from_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let name = name.into();
        let node = SceneNode::mesh(name.clone(), mesh.fit_to(1.0), Material::solid(Rgb::GREY));
        Self::new(
            SceneNode::group(name, vec![node]),
            Pose::new(
                Vector3::new(-2.0, -1.0, 0.0),
                RotationState::new(0.0, 4.0, 0.0),
                2.0,
            ),
        )
    }

    /// Orange wireframe box shown while the real model is unavailable
    pub fn placeholder() -> Self {
        Self::new(
            SceneNode::mesh("placeholder", Mesh::cube(1.0), Material::wireframe(Rgb::ORANGE)),
            Pose::new(Vector3::zeros(), RotationState::zero(), 2.0),
        )
    }

    /// Every mesh node with its material, in traversal order
    pub fn drawables(&self) -> Vec<(&Mesh, &Material)> {
        let mut out = Vec::new();
        self.root.traverse(&mut |node| {
            if let (Some(mesh), Some(material)) = (&node.mesh, &node.material) {
                out.push((mesh, material));
            }
        });
        out
    }
}

impl SceneHost for SceneModel {
    fn set_position_x(&mut self, x: f32) {
        self.pose.position.x = x;
    }

    fn set_rotation(&mut self, rotation: RotationState) {
        self.pose.rotation = rotation;
    }

    fn rotation(&self) -> RotationState {
        self.pose.rotation
    }

    fn for_each_material(&mut self, f: &mut dyn FnMut(&mut Material)) -> TraversalReport {
        let mut report = TraversalReport::default();
        self.root.traverse_mut(&mut |node| match (&node.mesh, &mut node.material) {
            (Some(_), Some(material)) => {
                f(material);
                report.visited += 1;
            }
            _ => report.skipped += 1,
        });
        report
    }
}
