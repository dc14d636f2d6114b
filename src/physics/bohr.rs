// src/physics/bohr.rs
//
// Bohr-model transition animation. Host-independent: the owner calls
// `advance(dt)` once per frame (GTK tick callback, test loop, headless run).

use crate::config::AnimationSettings;
use crate::model::spectral::BalmerTransition;
use crate::utils::color::Rgba;
use nalgebra::{Point3, Vector3};

/// Every Balmer drop ends here.
pub const GROUND_LEVEL: f64 = 2.0;

/// Crossing this on the way down counts as "landed".
const LANDING_THRESHOLD: f64 = 2.1;

/// Level assumed for the photon colour if the origin was never recorded.
const FALLBACK_ORIGIN: u8 = 3;

/// Visual orbit radius (scene units). Linear in n to keep n=6 on screen.
pub fn orbit_radius(level: f64) -> f64 {
    1.5 + (level - 1.0) * 1.0
}

/// Angular velocity falls as 1/√n.
pub fn angular_speed(level: f64) -> f64 {
    2.0 / level.max(1.0).sqrt()
}

// ============================================================================
// DEFERRED DROP
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CancelToken(u64);

#[derive(Debug, Clone, Copy)]
struct DeferredDrop {
    token: CancelToken,
    remaining: f64,
}

// ============================================================================
// PHOTONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct Photon {
    pub id: u64,
    pub from_level: u8,
    pub color: Rgba,
    pub age: f64,
    origin: Point3<f64>,
    direction: Vector3<f64>,
}

impl Photon {
    pub fn position(&self, speed: f64) -> Point3<f64> {
        self.origin + self.direction * (self.age * speed)
    }

    pub fn opacity(&self, lifetime: f64) -> f64 {
        if lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / lifetime).clamp(0.0, 1.0)
    }

    /// Wave-like pulsing while it flies.
    pub fn scale(&self) -> f64 {
        1.0 + (self.age * 10.0).sin() * 0.2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BohrEvent {
    PhotonEmitted { id: u64, from_level: u8 },
    PhotonExpired { id: u64 },
}

// ============================================================================
// ANIMATION STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct BohrAnimation {
    settings: AnimationSettings,
    current_level: f64,
    target_level: f64,
    angle: f64,
    origin_level: Option<u8>,
    pending: Option<DeferredDrop>,
    issued_tokens: u64,
    photons: Vec<Photon>,
    next_photon_id: u64,
    emitted_total: usize,
}

impl BohrAnimation {
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            current_level: GROUND_LEVEL,
            target_level: GROUND_LEVEL,
            angle: 0.0,
            origin_level: None,
            pending: None,
            issued_tokens: 0,
            photons: Vec::new(),
            next_photon_id: 0,
            emitted_total: 0,
        }
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: AnimationSettings) {
        self.settings = settings.sanitized();
    }

    pub fn current_level(&self) -> f64 {
        self.current_level
    }

    pub fn target_level(&self) -> f64 {
        self.target_level
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    pub fn emitted_total(&self) -> usize {
        self.emitted_total
    }

    pub fn has_pending_drop(&self) -> bool {
        self.pending.is_some()
    }

    /// Particle position on the orbit plane (y = 0).
    pub fn electron_position(&self) -> Point3<f64> {
        let r = orbit_radius(self.current_level);
        Point3::new(self.angle.cos() * r, 0.0, self.angle.sin() * r)
    }

    /// Jumps to level `n`, holds there, and schedules the drop to n=2.
    /// Any drop still pending from an earlier selection is superseded.
    pub fn select(&mut self, transition: BalmerTransition) -> CancelToken {
        let n = transition.level();
        self.current_level = n as f64;
        self.target_level = n as f64;
        self.origin_level = Some(n);

        self.issued_tokens += 1;
        let token = CancelToken(self.issued_tokens);
        self.pending = Some(DeferredDrop { token, remaining: self.settings.drop_delay.max(0.0) });

        log::debug!("Electron placed on n={}, drop in {:.2}s", n, self.settings.drop_delay);
        token
    }

    /// Back to n=2 from wherever the particle currently is.
    pub fn clear(&mut self) {
        self.pending = None;
        self.target_level = GROUND_LEVEL;
    }

    /// Cancels the pending drop if `token` still owns it.
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        match self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Follows the store: `Some` re-runs the transition, `None` clears it.
    pub fn sync(&mut self, active: Option<BalmerTransition>) {
        match active {
            Some(t) => {
                self.select(t);
            }
            None => self.clear(),
        }
    }

    /// Advances the animation by `dt` seconds and reports photon births/deaths.
    pub fn advance(&mut self, dt: f64) -> Vec<BohrEvent> {
        let mut events = Vec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return events;
        }

        // 1. Deferred drop
        if let Some(mut drop) = self.pending.take() {
            drop.remaining -= dt;
            if drop.remaining <= 0.0 {
                if drop.token == CancelToken(self.issued_tokens) {
                    self.target_level = GROUND_LEVEL;
                }
            } else {
                self.pending = Some(drop);
            }
        }

        // 2. Orbit
        self.angle += dt * angular_speed(self.current_level);

        // 3. Radius easing
        if self.current_level != self.target_level {
            let step = self.settings.drop_speed * dt;
            if self.current_level > self.target_level {
                let previous = self.current_level;
                let next = (self.current_level - step).max(self.target_level);
                self.current_level = next;

                if previous > LANDING_THRESHOLD && next <= LANDING_THRESHOLD {
                    events.push(self.emit_photon());
                }
            } else {
                self.current_level = (self.current_level + step).min(self.target_level);
            }
        }

        // 4. Photons in flight
        for photon in &mut self.photons {
            photon.age += dt;
        }
        let lifetime = self.settings.photon_lifetime;
        self.photons.retain(|p| {
            let alive = p.opacity(lifetime) > 0.0;
            if !alive {
                events.push(BohrEvent::PhotonExpired { id: p.id });
            }
            alive
        });

        events
    }

    fn emit_photon(&mut self) -> BohrEvent {
        let from_level = self.origin_level.take().unwrap_or(FALLBACK_ORIGIN);
        let origin = self.electron_position();
        let direction = origin.coords.try_normalize(1e-9).unwrap_or_else(Vector3::x);

        let id = self.next_photon_id;
        self.next_photon_id += 1;
        self.emitted_total += 1;

        self.photons.push(Photon {
            id,
            from_level,
            color: BalmerTransition::photon_color(from_level),
            age: 0.0,
            origin,
            direction,
        });

        log::debug!("Photon #{} emitted (n={} -> n=2)", id, from_level);
        BohrEvent::PhotonEmitted { id, from_level }
    }
}

impl Default for BohrAnimation {
    fn default() -> Self {
        Self::new(AnimationSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn run(anim: &mut BohrAnimation, seconds: f64) -> Vec<BohrEvent> {
        let mut events = Vec::new();
        let mut t = 0.0;
        while t < seconds {
            events.extend(anim.advance(FRAME));
            t += FRAME;
        }
        events
    }

    fn emitted(events: &[BohrEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                BohrEvent::PhotonEmitted { from_level, .. } => Some(*from_level),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_n5_transition_emits_exactly_one_photon() {
        let mut anim = BohrAnimation::default();
        anim.select(BalmerTransition::N5);

        assert_eq!(anim.current_level(), 5.0);
        assert!((anim.electron_position().coords.norm() - orbit_radius(5.0)).abs() < 1e-9);

        // still holding before the delay elapses
        let early = run(&mut anim, 0.4);
        assert_eq!(anim.current_level(), 5.0);
        assert!(early.is_empty());

        let rest = run(&mut anim, 2.0);
        assert_eq!(anim.current_level(), GROUND_LEVEL);
        assert_eq!(emitted(&rest), vec![5]);
        assert_eq!(anim.emitted_total(), 1);

        let photon_color = anim.photons()[0].color;
        assert_eq!(photon_color, BalmerTransition::photon_color(5));
        assert_eq!(photon_color, Rgba::rgb8(0x44, 0x44, 0xFF));
    }

    #[test]
    fn test_level_never_overshoots() {
        let mut anim = BohrAnimation::default();
        anim.select(BalmerTransition::N6);
        anim.advance(0.6);
        // one huge step must stop exactly on n=2
        anim.advance(10.0);
        assert_eq!(anim.current_level(), GROUND_LEVEL);
        assert_eq!(anim.emitted_total(), 1);
    }

    #[test]
    fn test_reselect_supersedes_pending_drop() {
        let mut anim = BohrAnimation::default();
        let first = anim.select(BalmerTransition::N3);
        anim.advance(0.3);
        let second = anim.select(BalmerTransition::N6);
        assert_ne!(first, second);

        // 0.6s after the first click: the stale drop must not fire
        anim.advance(0.3);
        assert_eq!(anim.current_level(), 6.0);
        assert!(!anim.cancel(first));

        let events = run(&mut anim, 3.0);
        assert_eq!(emitted(&events), vec![6]);
    }

    #[test]
    fn test_cancel_with_current_token() {
        let mut anim = BohrAnimation::default();
        let token = anim.select(BalmerTransition::N4);
        assert!(anim.cancel(token));
        run(&mut anim, 1.0);
        assert_eq!(anim.current_level(), 4.0);
    }

    #[test]
    fn test_clear_eases_from_current_position() {
        let mut anim = BohrAnimation::default();
        anim.select(BalmerTransition::N6);
        anim.clear();
        assert!(!anim.has_pending_drop());
        assert_eq!(anim.current_level(), 6.0);
        anim.advance(0.25);
        assert!((anim.current_level() - 5.0).abs() < 1e-9);
        let events = run(&mut anim, 2.0);
        assert_eq!(emitted(&events), vec![6]);
    }

    #[test]
    fn test_photons_fade_and_expire() {
        let mut anim = BohrAnimation::default();
        anim.select(BalmerTransition::N3);
        let events = run(&mut anim, 1.0);
        assert_eq!(emitted(&events).len(), 1);

        let photon = anim.photons()[0].clone();
        let speed = anim.settings().photon_speed;
        let lifetime = anim.settings().photon_lifetime;
        assert!(photon.opacity(lifetime) < 1.0);
        // moves radially outwards
        assert!(photon.position(speed).coords.norm() > orbit_radius(GROUND_LEVEL));

        let later = run(&mut anim, 2.5);
        assert!(later.contains(&BohrEvent::PhotonExpired { id: photon.id }));
        assert!(anim.photons().is_empty());
    }

    #[test]
    fn test_orbit_slower_on_higher_levels() {
        assert!(angular_speed(2.0) > angular_speed(6.0));
        let mut anim = BohrAnimation::default();
        anim.advance(0.5);
        assert!((anim.angle() - 0.5 * 2.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_ignores_bad_dt() {
        let mut anim = BohrAnimation::default();
        anim.select(BalmerTransition::N4);
        assert!(anim.advance(f64::NAN).is_empty());
        assert!(anim.advance(-1.0).is_empty());
        assert_eq!(anim.current_level(), 4.0);
        assert!(anim.has_pending_drop());
    }

    #[test]
    fn test_broken_settings_still_land_and_emit() {
        let broken = AnimationSettings { drop_speed: -4.0, photon_lifetime: 0.0, ..Default::default() };
        let mut anim = BohrAnimation::new(broken);
        anim.select(BalmerTransition::N3);

        let events = run(&mut anim, 10.0);
        assert_eq!(anim.current_level(), 2.0);
        assert_eq!(emitted(&events), vec![3]);

        // A photon outlives the frame it was born in
        anim.select(BalmerTransition::N4);
        let mut alive = false;
        for _ in 0..600 {
            let ev = anim.advance(FRAME);
            if !emitted(&ev).is_empty() {
                alive = !anim.photons().is_empty();
                break;
            }
        }
        assert!(alive);
    }
}
