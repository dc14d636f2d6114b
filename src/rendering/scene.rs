// src/rendering/scene.rs

use crate::utils::color::Rgba;
use nalgebra::{Isometry3, Perspective3, Point3, Vector3};

pub type NodeId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
  Sphere { radius: f64 },
  /// Circle in the XZ plane around `Node::position`.
  Ring { radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  pub shape: Shape,
  pub position: Point3<f64>,
  pub color: Rgba,
  pub opacity: f64,
  pub scale: f64,
  /// Flat-shaded (self-lit) instead of the sphere highlight.
  pub emissive: bool,
  pub label: Option<String>,
}

impl Node {
  pub fn sphere(position: Point3<f64>, radius: f64, color: Rgba) -> Self {
    Self {
      shape: Shape::Sphere { radius },
      position,
      color,
      opacity: 1.0,
      scale: 1.0,
      emissive: false,
      label: None,
    }
  }

  pub fn ring(radius: f64, color: Rgba, opacity: f64) -> Self {
    Self {
      shape: Shape::Ring { radius },
      position: Point3::origin(),
      color,
      opacity,
      scale: 1.0,
      emissive: true,
      label: None,
    }
  }

  pub fn emissive(mut self) -> Self {
    self.emissive = true;
    self
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }
}

// ============================================================================
// SCENE GRAPH
// ============================================================================

/// Retained list of meshes. Insertion order is kept for stable painting of
/// equal-depth nodes.
#[derive(Debug, Default)]
pub struct Scene {
  nodes: Vec<(NodeId, Node)>,
  next_id: NodeId,
}

impl Scene {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, node: Node) -> NodeId {
    let id = self.next_id;
    self.next_id += 1;
    self.nodes.push((id, node));
    id
  }

  pub fn remove(&mut self, id: NodeId) -> Option<Node> {
    let idx = self.nodes.iter().position(|(nid, _)| *nid == id)?;
    Some(self.nodes.remove(idx).1)
  }

  pub fn get(&self, id: NodeId) -> Option<&Node> {
    self.nodes.iter().find(|(nid, _)| *nid == id).map(|(_, n)| n)
  }

  pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
    self.nodes.iter_mut().find(|(nid, _)| *nid == id).map(|(_, n)| n)
  }

  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
    self.nodes.iter().map(|(id, n)| (*id, n))
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

// ============================================================================
// CAMERA
// ============================================================================

const MIN_DISTANCE: f64 = 5.0;
const MAX_DISTANCE: f64 = 20.0;
const ROTATE_SPEED: f64 = 0.01; // rad per pixel dragged
const PITCH_LIMIT: f64 = 1.5;
const Z_NEAR: f64 = 0.1;
const Z_FAR: f64 = 200.0;

/// A point after projection onto the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
  pub x: f64,
  pub y: f64,
  /// Distance along the view axis; larger is farther.
  pub depth: f64,
  /// Pixels per scene unit at this depth.
  pub scale: f64,
}

/// Orbits `target` on a sphere. Starts at (0, 5, 10) looking at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
  pub target: Point3<f64>,
  pub distance: f64,
  pub yaw: f64,
  pub pitch: f64,
  pub fov_y: f64,
}

impl Default for OrbitCamera {
  fn default() -> Self {
    let start = Vector3::<f64>::new(0.0, 5.0, 10.0);
    Self {
      target: Point3::origin(),
      distance: start.norm(),
      yaw: 0.0,
      pitch: (start.y / start.z).atan(),
      fov_y: 45f64.to_radians(),
    }
  }
}

impl OrbitCamera {
  pub fn eye(&self) -> Point3<f64> {
    let (sp, cp) = self.pitch.sin_cos();
    let (sy, cy) = self.yaw.sin_cos();
    self.target + Vector3::new(cp * sy, sp, cp * cy) * self.distance
  }

  /// Drag by (dx, dy) pixels.
  pub fn rotate(&mut self, dx: f64, dy: f64) {
    self.yaw -= dx * ROTATE_SPEED;
    self.pitch = (self.pitch + dy * ROTATE_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
  }

  /// Positive `steps` move away.
  pub fn zoom(&mut self, steps: f64) {
    self.distance = (self.distance * (1.0 + 0.1 * steps)).clamp(MIN_DISTANCE, MAX_DISTANCE);
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }

  pub fn view(&self) -> Isometry3<f64> {
    Isometry3::look_at_rh(&self.eye(), &self.target, &Vector3::y())
  }

  /// World -> widget pixels. `None` behind the near plane.
  pub fn project(&self, p: &Point3<f64>, width: f64, height: f64) -> Option<Projected> {
    if width <= 0.0 || height <= 0.0 {
      return None;
    }
    let view_p = self.view() * p;
    let depth = -view_p.z;
    if depth <= Z_NEAR {
      return None;
    }
    let proj = Perspective3::new(width / height, self.fov_y, Z_NEAR, Z_FAR);
    let ndc = proj.project_point(&view_p);
    let focal = (height / 2.0) / (self.fov_y / 2.0).tan();
    Some(Projected {
      x: (ndc.x + 1.0) * 0.5 * width,
      y: (1.0 - ndc.y) * 0.5 * height,
      depth,
      scale: focal / depth,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_add_remove_get() {
    let mut scene = Scene::new();
    let a = scene.add(Node::sphere(Point3::origin(), 0.4, Rgba::WHITE));
    let b = scene.add(Node::ring(2.5, Rgba::WHITE, 0.1).with_label("n=2"));
    assert_ne!(a, b);
    assert_eq!(scene.len(), 2);

    scene.get_mut(a).unwrap().opacity = 0.5;
    assert_eq!(scene.get(a).unwrap().opacity, 0.5);

    assert!(scene.remove(a).is_some());
    assert!(scene.remove(a).is_none());
    assert!(scene.get(a).is_none());
    assert_eq!(scene.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);

    // ids are never reused
    let c = scene.add(Node::sphere(Point3::origin(), 0.1, Rgba::WHITE));
    assert!(c > b);
  }

  #[test]
  fn test_camera_starts_at_reference_position() {
    let cam = OrbitCamera::default();
    let eye = cam.eye();
    assert!((eye - Point3::new(0.0, 5.0, 10.0)).norm() < 1e-9);
  }

  #[test]
  fn test_zoom_is_clamped() {
    let mut cam = OrbitCamera::default();
    cam.zoom(-50.0);
    assert_eq!(cam.distance, 5.0);
    for _ in 0..100 {
      cam.zoom(3.0);
    }
    assert_eq!(cam.distance, 20.0);
    cam.reset();
    assert_eq!(cam, OrbitCamera::default());
  }

  #[test]
  fn test_target_projects_to_centre() {
    let cam = OrbitCamera::default();
    let p = cam.project(&Point3::origin(), 600.0, 400.0).unwrap();
    assert!((p.x - 300.0).abs() < 1e-6);
    assert!((p.y - 200.0).abs() < 1e-6);
    // nearer things are larger
    let near = cam.project(&Point3::new(0.0, 0.0, 5.0), 600.0, 400.0).unwrap();
    assert!(near.scale > p.scale);
    // behind the eye
    assert!(cam.project(&Point3::new(0.0, 10.0, 20.0), 600.0, 400.0).is_none());
  }
}
