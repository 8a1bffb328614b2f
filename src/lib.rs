//! Adaptive Runner - an endless runner whose difficulty is tuned online
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, RL difficulty control)
//! - `config`: Immutable tuning knobs passed into the game at construction
//! - `platform`: Clock and input seams for whatever presents the game
//! - `highscores`: Session leaderboard
//! - `runner`: Multi-episode session driver used by the binary

pub mod config;
pub mod highscores;
pub mod platform;
pub mod runner;
pub mod sim;

pub use config::Config;
pub use highscores::HighScores;

/// Default tuning constants (the values `Config::default()` uses)
pub mod consts {
    /// Lateral offsets of the three lanes (left, middle, right)
    pub const LANES: [f32; 3] = [-1.5, 0.0, 1.5];
    /// Lane the player starts in
    pub const START_LANE: usize = 1;

    /// Player rests at this height
    pub const GROUND_HEIGHT: f32 = 2.0;
    /// Jump is accepted while within this distance of the ground
    pub const JUMP_TOLERANCE: f32 = 0.05;
    /// Vertical velocity added per tick
    pub const GRAVITY: f32 = -0.02;
    /// Vertical velocity set by a jump
    pub const JUMP_FORCE: f32 = 0.35;

    /// Longitudinal position new entities appear at
    pub const SPAWN_DISTANCE: f32 = 30.0;
    /// Entities behind this longitudinal position are dropped
    pub const REMOVAL_THRESHOLD: f32 = -10.0;
    pub const OBSTACLE_HEIGHT: f32 = 2.0;
    pub const COIN_HEIGHT: f32 = 2.4;
    /// Obstacles within +-this distance of the spawn point count as one row
    pub const ROW_WINDOW: f32 = 4.0;

    /// Collision half-extents (lateral, longitudinal, vertical)
    pub const COLLISION_X: f32 = 0.4;
    pub const COLLISION_Y: f32 = 0.6;
    pub const COLLISION_Z: f32 = 0.5;

    pub const BASE_SCROLL_SPEED: f32 = 0.18;
    pub const MAX_SCROLL_SPEED: f32 = 0.35;
    pub const INIT_DIFFICULTY: f32 = 1.0;
    pub const INIT_OBSTACLE_FREQ: f32 = 0.02;
    pub const INIT_COIN_FREQ: f32 = 0.25;

    /// Seconds of easy play before the RL controller engages
    pub const WARMUP_SECS: f32 = 10.0;
    /// Obstacle frequency multiplier during warmup
    pub const WARMUP_DAMPENING: f32 = 0.3;
    /// Minimum seconds between RL controller steps
    pub const RL_UPDATE_SECS: f32 = 1.0;

    /// Score gained per tick, scaled by difficulty
    pub const SCORE_PER_TICK: f32 = 0.5;
    pub const COIN_SCORE: f32 = 100.0;
    /// Every Nth coin bumps difficulty
    pub const COIN_MILESTONE: u32 = 50;
    pub const MILESTONE_MULTIPLIER: f32 = 1.2;
    pub const MILESTONE_CAP: f32 = 3.0;

    /// Agent hyper-parameters
    pub const EXPLORATION_RATE: f32 = 0.3;
    pub const DISCOUNT: f32 = 0.95;
    pub const LEARNING_RATE: f32 = 0.01;
}

/// Number of lanes the player and entities can occupy
pub const LANE_COUNT: usize = 3;

/// Lateral offset for a lane index.
///
/// Lane indices outside `0..LANE_COUNT` are a programming error.
#[inline]
pub fn lane_offset(lanes: &[f32; LANE_COUNT], lane: usize) -> f32 {
    assert!(lane < LANE_COUNT, "lane index {lane} out of range");
    lanes[lane]
}
