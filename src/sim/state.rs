//! Session state and screen flow types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::barrier::BarrierManager;
use super::camera::Camera;
use super::enemy::Enemy;
use super::particle::Particle;
use super::player::Player;
use crate::consts::*;

/// Immutable world bounds for one game session
///
/// Built once when a session starts from the viewport size at that moment;
/// entities receive it by reference and it never changes mid-session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl WorldConfig {
    /// World dimensions for a given viewport: at least `WORLD_MIN`, growing
    /// to 1.5x the viewport on large screens
    pub fn from_viewport(viewport: Vec2) -> Self {
        Self {
            width: WORLD_MIN.max(viewport.x * WORLD_VIEWPORT_FACTOR),
            height: WORLD_MIN.max(viewport.y * WORLD_VIEWPORT_FACTOR),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a position so a circle of `radius` stays fully inside the world
    pub fn clamp_inside(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, self.width - radius),
            pos.y.clamp(radius, self.height - radius),
        )
    }
}

/// Difficulty selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Tuning constants exposed by a difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPreset {
    /// Enemy base speed, world units per tick
    pub enemy_speed: f32,
    /// Per-cycle probability that a pickup spawn is attempted
    pub barrier_spawn: f64,
}

impl Difficulty {
    pub fn preset(&self) -> DifficultyPreset {
        match self {
            Difficulty::Easy => DifficultyPreset {
                enemy_speed: 1.2,
                barrier_spawn: 0.02,
            },
            Difficulty::Medium => DifficultyPreset {
                enemy_speed: 1.5,
                barrier_spawn: 0.015,
            },
            Difficulty::Hard => DifficultyPreset {
                enemy_speed: 2.0,
                barrier_spawn: 0.01,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// One screen of the game shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Menu,
    Playing,
    Paused,
    GameOver,
    Settings,
    Stats,
}

/// Allowed screen transitions. `Playing -> Menu` exists only for the
/// fatal-recovery path when a frame errors out mid-session.
const ALLOWED_TRANSITIONS: &[(Screen, Screen)] = &[
    (Screen::Loading, Screen::Menu),
    (Screen::Menu, Screen::Playing),
    (Screen::Menu, Screen::Settings),
    (Screen::Menu, Screen::Stats),
    (Screen::Playing, Screen::Paused),
    (Screen::Playing, Screen::GameOver),
    (Screen::Playing, Screen::Menu),
    (Screen::Paused, Screen::Playing),
    (Screen::Paused, Screen::Menu),
    (Screen::GameOver, Screen::Playing),
    (Screen::GameOver, Screen::Menu),
    (Screen::Settings, Screen::Menu),
    (Screen::Stats, Screen::Menu),
];

/// Screen state machine with an explicit transition table
///
/// Keeps the previous screen for a one-step "back" operation. Invalid
/// transitions are rejected and logged rather than applied.
#[derive(Debug, Clone)]
pub struct ScreenState {
    current: Screen,
    previous: Option<Screen>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            current: Screen::Loading,
            previous: None,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn is(&self, screen: Screen) -> bool {
        self.current == screen
    }

    /// Attempt a transition; returns false (and logs) if the pair is not in
    /// the transition table
    pub fn set(&mut self, next: Screen) -> bool {
        if next == self.current {
            return true;
        }
        if !ALLOWED_TRANSITIONS.contains(&(self.current, next)) {
            log::warn!(
                "Rejected screen transition {:?} -> {:?}",
                self.current,
                next
            );
            return false;
        }
        log::info!("Screen {:?} -> {:?}", self.current, next);
        self.previous = Some(self.current);
        self.current = next;
        true
    }

    /// Return to the previously active screen, if that transition is allowed
    pub fn go_back(&mut self) -> bool {
        match self.previous {
            Some(prev) => self.set(prev),
            None => false,
        }
    }
}

/// Feedback notification emitted by the simulation, drained by the host once
/// per frame. Fire-and-forget: the sim never waits on the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A shield pickup was collected
    Collect,
    /// A carried shield was spent for invulnerability
    BarrierUsed,
    /// Shield activation failed (none carried or already invulnerable)
    BarrierDenied,
    /// Dash activated
    Dash,
    /// The enemy caught the player
    GameOver,
}

/// Complete state of one game session
///
/// Exactly one player and one enemy exist while a session is active; the
/// whole struct is rebuilt on restart.
pub struct GameSession {
    pub world: WorldConfig,
    pub difficulty: Difficulty,
    /// Elapsed game time in seconds (ticks * TICK_DT)
    pub elapsed: f32,
    pub ticks: u64,
    pub is_active: bool,
    pub player: Player,
    pub enemy: Enemy,
    pub barriers: BarrierManager,
    /// Session-global effect particles (pickup bursts etc.)
    pub effects: Vec<Particle>,
    pub camera: Camera,
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Start a fresh session: player at world center, enemy offset from it,
    /// no pickups, camera snapped to the player
    pub fn new(seed: u64, difficulty: Difficulty, viewport: Vec2) -> Self {
        let world = WorldConfig::from_viewport(viewport);
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(world.center());
        let enemy = Enemy::new(&world, difficulty, &mut rng);
        let mut camera = Camera::new(viewport);
        camera.snap_to(player.pos, &world);
        Self {
            world,
            difficulty,
            elapsed: 0.0,
            ticks: 0,
            is_active: true,
            player,
            enemy,
            barriers: BarrierManager::new(),
            effects: Vec::new(),
            camera,
            rng,
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the feedback events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_config_minimum() {
        let world = WorldConfig::from_viewport(Vec2::new(400.0, 300.0));
        assert_eq!(world.width, WORLD_MIN);
        assert_eq!(world.height, WORLD_MIN);
    }

    #[test]
    fn test_world_config_scales_with_viewport() {
        let world = WorldConfig::from_viewport(Vec2::new(2000.0, 700.0));
        assert_eq!(world.width, 3000.0);
        assert_eq!(world.height, WORLD_MIN);
    }

    #[test]
    fn test_clamp_inside() {
        let world = WorldConfig {
            width: 1200.0,
            height: 1200.0,
        };
        let clamped = world.clamp_inside(Vec2::new(-50.0, 5000.0), 20.0);
        assert_eq!(clamped, Vec2::new(20.0, 1180.0));
    }

    #[test]
    fn test_screen_transitions_follow_table() {
        let mut screens = ScreenState::new();
        assert!(screens.set(Screen::Menu));
        assert!(screens.set(Screen::Playing));
        assert!(screens.set(Screen::Paused));
        assert!(screens.set(Screen::Playing));
        assert!(screens.set(Screen::GameOver));
        assert!(screens.set(Screen::Menu));
    }

    #[test]
    fn test_invalid_transition_rejected() {
        let mut screens = ScreenState::new();
        // Cannot jump from Loading straight into a session
        assert!(!screens.set(Screen::Playing));
        assert_eq!(screens.current(), Screen::Loading);

        screens.set(Screen::Menu);
        screens.set(Screen::Settings);
        // Settings cannot reach Stats directly
        assert!(!screens.set(Screen::Stats));
        assert_eq!(screens.current(), Screen::Settings);
    }

    #[test]
    fn test_go_back() {
        let mut screens = ScreenState::new();
        screens.set(Screen::Menu);
        screens.set(Screen::Settings);
        assert!(screens.go_back());
        assert_eq!(screens.current(), Screen::Menu);
    }

    #[test]
    fn test_new_session_is_reset() {
        let viewport = Vec2::new(800.0, 600.0);
        let session = GameSession::new(7, Difficulty::Medium, viewport);
        assert!(session.is_active);
        assert_eq!(session.elapsed, 0.0);
        assert_eq!(session.player.pos, session.world.center());
        assert_eq!(session.player.barriers, 0);
        assert!(!session.player.is_invulnerable());
        assert_eq!(session.barriers.active.len(), 0);
        // Enemy starts at its fixed spawn radius from center
        let dist = session.enemy.pos.distance(session.world.center());
        assert!((dist - crate::consts::ENEMY_SPAWN_RADIUS).abs() < 1.0);
    }
}
