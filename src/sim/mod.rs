//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only (one call to `tick` = one 60 Hz step)
//! - Seeded RNG only
//! - Entities update in a fixed order (player, enemy, pickups, effects, camera)
//! - No rendering or platform dependencies

pub mod barrier;
pub mod camera;
pub mod enemy;
pub mod particle;
pub mod player;
pub mod state;
pub mod tick;

pub use barrier::{Barrier, BarrierManager};
pub use camera::Camera;
pub use enemy::Enemy;
pub use particle::{Particle, ParticleColor};
pub use player::Player;
pub use state::{
    Difficulty, DifficultyPreset, GameEvent, GameSession, Screen, ScreenState, WorldConfig,
};
pub use tick::{TickInput, tick};
