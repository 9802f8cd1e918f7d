//! Player entity
//!
//! Consumes a per-tick movement-intent vector from the input layer and keeps
//! all ability state (shields, dash, invulnerability). No I/O happens here;
//! feedback-worthy outcomes are reported through return values.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::particle::{self, Particle, ParticleColor};
use super::state::WorldConfig;
use crate::consts::*;

pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    /// Shields currently carried
    pub barriers: u32,
    /// Ticks of collision immunity remaining
    pub invulnerable_ticks: u32,
    pub vel: Vec2,
    pub is_dashing: bool,
    pub dash_cooldown: u32,
    max_speed: f32,
    pub particles: Vec<Particle>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PLAYER_SIZE,
            barriers: 0,
            invulnerable_ticks: 0,
            vel: Vec2::ZERO,
            is_dashing: false,
            dash_cooldown: 0,
            max_speed: PLAYER_MAX_SPEED,
            particles: Vec::new(),
        }
    }

    /// Advance one tick.
    ///
    /// `intent` is a movement direction with magnitude in [0, 1], already
    /// normalized by the input layer; the player scales it by its own max
    /// speed (which is higher mid-dash). A zero intent lets friction glide
    /// the previous velocity to a stop.
    pub fn update(&mut self, intent: Vec2, world: &WorldConfig, rng: &mut Pcg32) {
        if intent.length_squared() > f32::EPSILON {
            self.vel = intent.clamp_length_max(1.0) * self.max_speed;
        } else {
            self.vel *= PLAYER_FRICTION;
        }

        self.pos += self.vel;
        self.pos = world.clamp_inside(self.pos, self.size);

        if self.dash_cooldown > 0 {
            self.dash_cooldown -= 1;
            if self.is_dashing && self.dash_cooldown <= DASH_COOLDOWN_TICKS - DASH_ACTIVE_TICKS {
                self.is_dashing = false;
                self.max_speed = PLAYER_MAX_SPEED;
            }
        }

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);

        particle::update_particles(&mut self.particles);

        // Faint trail while moving
        if self.vel.length_squared() > 0.01 && rng.random_bool(0.3) {
            particle::emit_burst(&mut self.particles, self.pos, ParticleColor::Player, 1, rng);
        }
    }

    /// Spend a carried shield for a fixed invulnerability window.
    ///
    /// Strict variant: denied while a window is already active. The caller
    /// keys success/failure feedback (sound, haptics) on the return value.
    pub fn use_barrier(&mut self, rng: &mut Pcg32) -> bool {
        if self.barriers == 0 || self.is_invulnerable() {
            return false;
        }
        self.barriers -= 1;
        self.invulnerable_ticks = BARRIER_INVULN_TICKS;
        particle::emit_burst(&mut self.particles, self.pos, ParticleColor::Shield, 30, rng);
        true
    }

    /// Bank a collected shield; refused at carry capacity.
    pub fn add_barrier(&mut self, rng: &mut Pcg32) -> bool {
        if self.barriers >= BARRIER_CARRY_CAP {
            return false;
        }
        self.barriers += 1;
        particle::emit_burst(&mut self.particles, self.pos, ParticleColor::Shield, 15, rng);
        true
    }

    /// Short speed burst with its own brief invulnerability window.
    pub fn activate_dash(&mut self, rng: &mut Pcg32) -> bool {
        if self.dash_cooldown > 0 || self.is_dashing {
            return false;
        }
        self.is_dashing = true;
        self.dash_cooldown = DASH_COOLDOWN_TICKS;
        self.max_speed = DASH_MAX_SPEED;
        // Never shorten a shield window already running
        self.invulnerable_ticks = self.invulnerable_ticks.max(DASH_INVULN_TICKS);
        particle::emit_burst(&mut self.particles, self.pos, ParticleColor::Player, 20, rng);
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Fraction of the dash cooldown remaining, for the HUD ring
    pub fn dash_cooldown_fraction(&self) -> f32 {
        self.dash_cooldown as f32 / DASH_COOLDOWN_TICKS as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn world() -> WorldConfig {
        WorldConfig {
            width: 1200.0,
            height: 1200.0,
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1)
    }

    fn player() -> Player {
        Player::new(Vec2::new(600.0, 600.0))
    }

    #[test]
    fn test_use_barrier_with_none_is_denied() {
        let mut p = player();
        let mut rng = rng();
        assert!(!p.use_barrier(&mut rng));
        assert_eq!(p.invulnerable_ticks, 0);
    }

    #[test]
    fn test_use_barrier_spends_and_grants_window() {
        let mut p = player();
        let mut rng = rng();
        p.barriers = 2;
        assert!(p.use_barrier(&mut rng));
        assert_eq!(p.barriers, 1);
        assert_eq!(p.invulnerable_ticks, BARRIER_INVULN_TICKS);
        assert!(p.is_invulnerable());
    }

    #[test]
    fn test_use_barrier_denied_while_invulnerable() {
        let mut p = player();
        let mut rng = rng();
        p.barriers = 2;
        assert!(p.use_barrier(&mut rng));
        assert!(!p.use_barrier(&mut rng));
        assert_eq!(p.barriers, 1);
    }

    #[test]
    fn test_add_barrier_capacity() {
        let mut p = player();
        let mut rng = rng();
        for _ in 0..BARRIER_CARRY_CAP {
            assert!(p.add_barrier(&mut rng));
        }
        assert_eq!(p.barriers, BARRIER_CARRY_CAP);
        // Beyond capacity: refused, state unchanged
        assert!(!p.add_barrier(&mut rng));
        assert_eq!(p.barriers, BARRIER_CARRY_CAP);
    }

    #[test]
    fn test_position_stays_in_bounds_under_extreme_intent() {
        let mut p = player();
        let mut rng = rng();
        let w = world();
        // Push hard toward a corner far longer than needed to reach it
        for _ in 0..2000 {
            p.update(Vec2::new(100.0, 100.0), &w, &mut rng);
            assert!(p.pos.x >= p.size && p.pos.x <= w.width - p.size);
            assert!(p.pos.y >= p.size && p.pos.y <= w.height - p.size);
        }
        assert_eq!(p.pos, Vec2::new(w.width - p.size, w.height - p.size));
    }

    #[test]
    fn test_friction_glides_to_stop() {
        let mut p = player();
        let mut rng = rng();
        let w = world();
        p.update(Vec2::new(1.0, 0.0), &w, &mut rng);
        assert!(p.vel.length() > 0.0);
        for _ in 0..300 {
            p.update(Vec2::ZERO, &w, &mut rng);
        }
        assert!(p.vel.length() < 0.01);
    }

    #[test]
    fn test_dash_boosts_then_cools_down() {
        let mut p = player();
        let mut rng = rng();
        let w = world();
        assert!(p.activate_dash(&mut rng));
        assert!(p.is_dashing);
        assert_eq!(p.invulnerable_ticks, DASH_INVULN_TICKS);
        // Denied while cooling down
        assert!(!p.activate_dash(&mut rng));

        p.update(Vec2::new(1.0, 0.0), &w, &mut rng);
        assert!((p.vel.length() - DASH_MAX_SPEED).abs() < 1e-3);

        for _ in 0..DASH_COOLDOWN_TICKS {
            p.update(Vec2::ZERO, &w, &mut rng);
        }
        assert!(!p.is_dashing);
        assert_eq!(p.dash_cooldown, 0);
        assert!(p.activate_dash(&mut rng));
    }

    #[test]
    fn test_invulnerability_counts_down() {
        let mut p = player();
        let mut rng = rng();
        let w = world();
        p.barriers = 1;
        p.use_barrier(&mut rng);
        for _ in 0..BARRIER_INVULN_TICKS {
            p.update(Vec2::ZERO, &w, &mut rng);
        }
        assert!(!p.is_invulnerable());
        // Never goes negative
        p.update(Vec2::ZERO, &w, &mut rng);
        assert_eq!(p.invulnerable_ticks, 0);
    }
}
