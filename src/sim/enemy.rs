//! Enemy entity - pursuit steering
//!
//! The enemy always tracks the player, but its heading turns toward the
//! target bearing through a proportional smoothing gain rather than snapping,
//! with periodic jitter injected so the chase never looks perfectly robotic.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::PI;

use super::particle::{self, Particle, ParticleColor};
use super::player::Player;
use super::state::{Difficulty, WorldConfig};
use crate::consts::*;
use crate::normalize_angle;

pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    /// Travel direction in radians
    pub heading: f32,
    /// Current speed, world units per tick (difficulty base times ramp)
    pub speed: f32,
    direction_change: u32,
    /// Cosmetic pulse animation phase
    pub pulse_phase: f32,
    pub particles: Vec<Particle>,
}

impl Enemy {
    /// Spawn at a fixed radius from the world center at a random angle
    pub fn new(world: &WorldConfig, difficulty: Difficulty, rng: &mut Pcg32) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let offset = Vec2::new(angle.cos(), angle.sin()) * ENEMY_SPAWN_RADIUS;
        Self {
            pos: world.center() + offset,
            size: ENEMY_SIZE,
            heading: 0.0,
            speed: difficulty.preset().enemy_speed,
            direction_change: 0,
            pulse_phase: 0.0,
            particles: Vec::new(),
        }
    }

    /// Advance one tick of pursuit toward the player's current position
    pub fn update(&mut self, player_pos: Vec2, world: &WorldConfig, rng: &mut Pcg32) {
        // Periodic heading jitter
        self.direction_change += 1;
        if self.direction_change > HEADING_JITTER_INTERVAL {
            self.direction_change = 0;
            self.heading += rng.random_range(-HEADING_JITTER..HEADING_JITTER);
        }

        // Smoothed turn toward the player's bearing
        let to_player = player_pos - self.pos;
        let target_heading = to_player.y.atan2(to_player.x);
        let delta = normalize_angle(target_heading - self.heading);
        self.heading += delta * TURN_GAIN;

        self.pos += Vec2::new(self.heading.cos(), self.heading.sin()) * self.speed;

        // Bounce off world edges
        if self.pos.x < self.size || self.pos.x > world.width - self.size {
            self.heading = PI - self.heading;
            self.pos.x = self.pos.x.clamp(self.size, world.width - self.size);
        }
        if self.pos.y < self.size || self.pos.y > world.height - self.size {
            self.heading = -self.heading;
            self.pos.y = self.pos.y.clamp(self.size, world.height - self.size);
        }

        self.pulse_phase += 0.1;

        particle::update_particles(&mut self.particles);
        if rng.random_bool(ENEMY_TRAIL_CHANCE) {
            particle::emit_burst(&mut self.particles, self.pos, ParticleColor::Enemy, 1, rng);
        }
    }

    /// Collision against the player, suppressed entirely while a shield or
    /// dash invulnerability window is active.
    ///
    /// The hitbox is shrunk to 0.8x the visual radii sum so grazing passes
    /// feel fair.
    pub fn check_collision(&self, player: &Player) -> bool {
        if player.is_invulnerable() {
            return false;
        }
        let collision_distance = (self.size + player.size) * 0.8;
        self.pos.distance(player.pos) < collision_distance
    }
}

/// Speed multiplier over the session: 1.0 for the grace period, then a linear
/// ramp capped so late sessions stay physically playable
pub fn ramp_factor(elapsed_secs: f32) -> f32 {
    if elapsed_secs <= RAMP_GRACE_SECS {
        1.0
    } else {
        (1.0 + (elapsed_secs - RAMP_GRACE_SECS) / RAMP_DIVISOR).min(RAMP_MAX_FACTOR)
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
        Pcg32::seed_from_u64(9)
    }

    #[test]
    fn test_collision_at_zero_distance() {
        let mut rng = rng();
        let enemy = Enemy::new(&world(), Difficulty::Medium, &mut rng);
        let mut player = Player::new(enemy.pos);
        assert!(enemy.check_collision(&player));

        // Suppressed at any distance, including zero, while invulnerable
        player.barriers = 1;
        player.use_barrier(&mut rng);
        assert!(!enemy.check_collision(&player));
    }

    #[test]
    fn test_collision_uses_forgiving_hitbox() {
        let mut rng = rng();
        let mut enemy = Enemy::new(&world(), Difficulty::Medium, &mut rng);
        enemy.pos = Vec2::new(600.0, 600.0);
        let threshold = (enemy.size + PLAYER_SIZE) * 0.8;

        let touching = Player::new(enemy.pos + Vec2::new(threshold - 0.5, 0.0));
        assert!(enemy.check_collision(&touching));

        // Visually overlapping but outside the shrunk hitbox
        let grazing = Player::new(enemy.pos + Vec2::new(threshold + 0.5, 0.0));
        assert!(!enemy.check_collision(&grazing));
    }

    #[test]
    fn test_heading_never_overshoots_target() {
        let mut rng = rng();
        let w = world();
        let mut enemy = Enemy::new(&w, Difficulty::Medium, &mut rng);
        enemy.pos = w.center();
        enemy.heading = 0.0;
        let player_pos = enemy.pos + Vec2::new(0.0, 400.0);

        let before = enemy.heading;
        let target = (player_pos - enemy.pos).y.atan2((player_pos - enemy.pos).x);
        let delta = normalize_angle(target - before);

        enemy.update(player_pos, &w, &mut rng);

        // One step moves at most |delta| * gain plus the jitter bound
        let moved = normalize_angle(enemy.heading - before).abs();
        assert!(moved <= delta.abs() * TURN_GAIN + HEADING_JITTER + 1e-4);
    }

    #[test]
    fn test_stays_in_bounds_while_pursuing_corner() {
        let mut rng = rng();
        let w = world();
        let mut enemy = Enemy::new(&w, Difficulty::Hard, &mut rng);
        enemy.speed = 20.0;
        // Chase a target pinned in a corner for a long time
        let corner = Vec2::new(10.0, 10.0);
        for _ in 0..2000 {
            enemy.update(corner, &w, &mut rng);
            assert!(enemy.pos.x >= enemy.size && enemy.pos.x <= w.width - enemy.size);
            assert!(enemy.pos.y >= enemy.size && enemy.pos.y <= w.height - enemy.size);
        }
    }

    #[test]
    fn test_pursuit_closes_distance() {
        let mut rng = rng();
        let w = world();
        let mut enemy = Enemy::new(&w, Difficulty::Medium, &mut rng);
        let player_pos = w.center();
        let start = enemy.pos.distance(player_pos);
        for _ in 0..120 {
            enemy.update(player_pos, &w, &mut rng);
        }
        assert!(enemy.pos.distance(player_pos) < start);
    }

    #[test]
    fn test_ramp_factor_checkpoints() {
        assert_eq!(ramp_factor(0.0), 1.0);
        assert_eq!(ramp_factor(RAMP_GRACE_SECS), 1.0);
        // Known point on the linear ramp: double speed at grace + divisor
        let at_double = RAMP_GRACE_SECS + RAMP_DIVISOR;
        assert!((ramp_factor(at_double) - 2.0).abs() < 1e-5);
        // Capped thereafter
        assert_eq!(ramp_factor(10_000.0), RAMP_MAX_FACTOR);
    }
}
