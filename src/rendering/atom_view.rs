// src/rendering/atom_view.rs
//
// Owns the Bohr animation and mirrors it into the retained scene:
// nucleus, orbit rings, electron, photons in flight, electron trail.

use super::scene::{Node, NodeId, OrbitCamera, Scene};
use crate::config::AnimationSettings;
use crate::model::spectral::BalmerTransition;
use crate::physics::bohr::{orbit_radius, BohrAnimation, BohrEvent};
use crate::utils::color::Rgba;
use nalgebra::Point3;
use std::collections::{HashMap, VecDeque};

pub const TRAIL_LENGTH: usize = 12;
pub const ORBIT_LEVELS: std::ops::RangeInclusive<u8> = 1..=6;

const PROTON: Rgba = Rgba::rgb8(0xEF, 0x44, 0x44);
const NEUTRON: Rgba = Rgba::rgb8(0x94, 0xA3, 0xB8);
pub const ELECTRON: Rgba = Rgba::rgb8(0x38, 0xBD, 0xF8);
const RING_OPACITY: f64 = 0.1;
const ELECTRON_RADIUS: f64 = 0.15;
const PHOTON_RADIUS: f64 = 0.15;

pub struct AtomView {
    anim: BohrAnimation,
    scene: Scene,
    camera: OrbitCamera,
    electron: NodeId,
    photons: HashMap<u64, NodeId>,
    trail: VecDeque<Point3<f64>>,
}

impl AtomView {
    pub fn new(settings: AnimationSettings) -> Self {
        let mut scene = Scene::new();

        // Nucleus
        scene.add(Node::sphere(Point3::origin(), 0.4, PROTON));
        scene.add(Node::sphere(Point3::new(0.2, 0.2, 0.0), 0.25, PROTON));
        scene.add(Node::sphere(Point3::new(-0.2, -0.1, 0.2), 0.25, NEUTRON));
        scene.add(Node::sphere(Point3::new(0.1, -0.3, -0.1), 0.25, NEUTRON));

        for n in ORBIT_LEVELS {
            let r = orbit_radius(n as f64);
            scene.add(Node::ring(r, Rgba::WHITE, RING_OPACITY).with_label(format!("n={}", n)));
        }

        let anim = BohrAnimation::new(settings);
        let electron = scene.add(Node::sphere(anim.electron_position(), ELECTRON_RADIUS, ELECTRON).emissive());

        Self {
            anim,
            scene,
            camera: OrbitCamera::default(),
            electron,
            photons: HashMap::new(),
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn animation(&self) -> &BohrAnimation {
        &self.anim
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Oldest first.
    pub fn trail(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.trail.iter()
    }

    pub fn set_animation_settings(&mut self, settings: AnimationSettings) {
        self.anim.set_settings(settings);
    }

    pub fn set_transition(&mut self, transition: Option<BalmerTransition>) {
        self.anim.sync(transition);
    }

    /// One frame: advance the animation, then bring the scene up to date.
    pub fn tick(&mut self, dt: f64) -> Vec<BohrEvent> {
        let events = self.anim.advance(dt);

        for event in &events {
            match *event {
                BohrEvent::PhotonEmitted { id, from_level } => {
                    let color = BalmerTransition::photon_color(from_level);
                    let node = Node::sphere(self.anim.electron_position(), PHOTON_RADIUS, color).emissive();
                    self.photons.insert(id, self.scene.add(node));
                }
                BohrEvent::PhotonExpired { id } => {
                    if let Some(node) = self.photons.remove(&id) {
                        self.scene.remove(node);
                    }
                }
            }
        }

        let settings = *self.anim.settings();
        for photon in self.anim.photons() {
            let Some(node_id) = self.photons.get(&photon.id) else {
                continue;
            };
            if let Some(node) = self.scene.get_mut(*node_id) {
                node.position = photon.position(settings.photon_speed);
                node.opacity = photon.opacity(settings.photon_lifetime);
                node.scale = photon.scale();
            }
        }

        let pos = self.anim.electron_position();
        if let Some(node) = self.scene.get_mut(self.electron) {
            node.position = pos;
        }
        if dt.is_finite() && dt > 0.0 {
            if self.trail.len() == TRAIL_LENGTH {
                self.trail.pop_front();
            }
            self.trail.push_back(pos);
        }

        events
    }

    pub fn photon_nodes(&self) -> usize {
        self.photons.len()
    }
}
