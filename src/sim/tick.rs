//! Fixed-step orchestration
//!
//! One call to `tick` advances the session by exactly one 60 Hz step, in a
//! fixed order: player, enemy, pickups, effects, camera, then the collision
//! check. The order matters: the enemy steers toward the player's
//! current-tick position, never the previous one.

use glam::Vec2;

use super::enemy;
use super::particle;
use super::state::{GameEvent, GameSession};
use crate::consts::TICK_DT;

/// Input commands for a single tick
///
/// `intent` is the movement direction captured by the input layer, magnitude
/// already clamped to [0, 1]. The action flags are one-shot; the host clears
/// them after each processed step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub intent: Vec2,
    pub use_barrier: bool,
    pub dash: bool,
}

/// Advance the session by one fixed timestep.
///
/// Does nothing once the session has ended; pausing is handled by the host
/// simply not calling this.
pub fn tick(session: &mut GameSession, input: &TickInput) {
    if !session.is_active {
        return;
    }

    session.ticks += 1;
    session.elapsed = session.ticks as f32 * TICK_DT;

    // Discrete actions first, so a shield raised this tick already guards
    // this tick's collision check
    if input.use_barrier {
        let event = if session.player.use_barrier(&mut session.rng) {
            GameEvent::BarrierUsed
        } else {
            GameEvent::BarrierDenied
        };
        session.push_event(event);
    }
    if input.dash && session.player.activate_dash(&mut session.rng) {
        session.push_event(GameEvent::Dash);
    }

    // Enemy speed is recomputed every tick from the difficulty ramp
    let preset = session.difficulty.preset();
    session.enemy.speed = preset.enemy_speed * enemy::ramp_factor(session.elapsed);

    session
        .player
        .update(input.intent, &session.world, &mut session.rng);
    session
        .enemy
        .update(session.player.pos, &session.world, &mut session.rng);

    let enemy_pos = session.enemy.pos;
    let collected = session.barriers.update(
        &mut session.player,
        enemy_pos,
        &session.world,
        &preset,
        &mut session.rng,
        &mut session.effects,
    );
    for _ in 0..collected {
        session.push_event(GameEvent::Collect);
    }

    particle::update_particles(&mut session.effects);

    session.camera.update(session.player.pos, &session.world);

    if session.enemy.check_collision(&session.player) {
        session.is_active = false;
        session.push_event(GameEvent::GameOver);
    }
}
