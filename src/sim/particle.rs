//! Ephemeral effect particles
//!
//! Particles are plain data records in homogeneous `Vec`s, advanced in bulk by
//! free functions. Behavior differences between burst styles live in per-record
//! drag/decay values, not per-particle callbacks.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::MAX_PARTICLES;

/// Color token resolved to a concrete style by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    /// Player trail / dash (cyan)
    Player,
    /// Enemy trail (red)
    Enemy,
    /// Shield pickups and activation (gold)
    Shield,
}

impl ParticleColor {
    pub fn css(&self) -> &'static str {
        match self {
            ParticleColor::Player => "#48dbfb",
            ParticleColor::Enemy => "#ff6b6b",
            ParticleColor::Shield => "#feca57",
        }
    }
}

/// A single effect particle
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, 1.0 at spawn, monotonically decreasing
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: ParticleColor,
    /// Per-tick velocity damping
    drag: f32,
    /// Per-tick life decrement
    decay: f32,
}

impl Particle {
    /// Render alpha derived from remaining life
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Advance all particles one tick and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel *= p.drag;
        p.life -= p.decay;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Omnidirectional burst with randomized velocity and size (trails, dashes,
/// shield activation)
pub fn emit_burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: ParticleColor,
    count: usize,
    rng: &mut Pcg32,
) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            return;
        }
        particles.push(Particle {
            pos,
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
            life: 1.0,
            max_life: rng.random_range(0.5..1.5),
            size: rng.random_range(2.0..5.0),
            color,
            drag: 0.98,
            decay: 0.02,
        });
    }
}

/// Evenly spaced expanding ring (pickup spawn flourish)
pub fn emit_ring(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: ParticleColor,
    count: usize,
    rng: &mut Pcg32,
) {
    for i in 0..count {
        if particles.len() >= MAX_PARTICLES {
            return;
        }
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * 2.0,
            life: 1.0,
            max_life: 1.0,
            size: rng.random_range(2.0..4.0),
            color,
            drag: 0.9,
            decay: 0.04,
        });
    }
}

/// Random-direction scatter with varied speed (pickup collection)
pub fn emit_scatter(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: ParticleColor,
    count: usize,
    rng: &mut Pcg32,
) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            return;
        }
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(1.0..4.0);
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            max_life: rng.random_range(0.8..1.2),
            size: rng.random_range(1.0..3.0),
            color,
            drag: 0.95,
            decay: 0.03,
        });
    }
}
