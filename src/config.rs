//! Game configuration
//!
//! Everything tunable lives in one immutable struct handed to the game at
//! construction. Missing JSON fields fall back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::LANE_COUNT;
use crate::consts::*;

/// Inclusive clamp range for a difficulty parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Clamp ranges applied after every controller step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Clamps {
    pub difficulty: Range,
    pub scroll_speed: Range,
    pub obstacle_freq: Range,
    pub coin_freq: Range,
}

impl Default for Clamps {
    fn default() -> Self {
        Self {
            difficulty: Range::new(0.8, 2.8),
            scroll_speed: Range::new(BASE_SCROLL_SPEED, MAX_SCROLL_SPEED),
            obstacle_freq: Range::new(0.01, 0.18),
            coin_freq: Range::new(0.1, 0.6),
        }
    }
}

/// Linear Q-learning hyper-parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Probability of a uniformly random action
    pub exploration_rate: f32,
    /// Discount factor (gamma)
    pub discount: f32,
    /// Step size (alpha)
    pub learning_rate: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            exploration_rate: EXPLORATION_RATE,
            discount: DISCOUNT,
            learning_rate: LEARNING_RATE,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Track ===
    pub lanes: [f32; LANE_COUNT],
    pub start_lane: usize,

    // === Player physics ===
    pub ground_height: f32,
    pub jump_tolerance: f32,
    pub gravity: f32,
    pub jump_force: f32,

    // === Entities ===
    pub spawn_distance: f32,
    pub removal_threshold: f32,
    pub obstacle_height: f32,
    pub coin_height: f32,
    pub row_window: f32,
    /// Collision half-extents (lateral, longitudinal, vertical)
    pub collision_box: [f32; 3],

    // === Difficulty ===
    pub init_difficulty: f32,
    pub base_scroll_speed: f32,
    pub init_obstacle_freq: f32,
    pub init_coin_freq: f32,
    pub clamps: Clamps,
    /// Difficulty band that earns positive reward
    pub reward_band: Range,

    // === Controller timing ===
    pub warmup_secs: f32,
    pub warmup_dampening: f32,
    pub rl_update_secs: f32,

    // === Scoring ===
    pub score_per_tick: f32,
    pub coin_score: f32,
    pub coin_milestone: u32,
    pub milestone_multiplier: f32,
    pub milestone_cap: f32,

    pub agent: AgentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lanes: LANES,
            start_lane: START_LANE,

            ground_height: GROUND_HEIGHT,
            jump_tolerance: JUMP_TOLERANCE,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,

            spawn_distance: SPAWN_DISTANCE,
            removal_threshold: REMOVAL_THRESHOLD,
            obstacle_height: OBSTACLE_HEIGHT,
            coin_height: COIN_HEIGHT,
            row_window: ROW_WINDOW,
            collision_box: [COLLISION_X, COLLISION_Y, COLLISION_Z],

            init_difficulty: INIT_DIFFICULTY,
            base_scroll_speed: BASE_SCROLL_SPEED,
            init_obstacle_freq: INIT_OBSTACLE_FREQ,
            init_coin_freq: INIT_COIN_FREQ,
            clamps: Clamps::default(),
            reward_band: Range::new(0.9, 2.4),

            warmup_secs: WARMUP_SECS,
            warmup_dampening: WARMUP_DAMPENING,
            rl_update_secs: RL_UPDATE_SECS,

            score_per_tick: SCORE_PER_TICK,
            coin_score: COIN_SCORE,
            coin_milestone: COIN_MILESTONE,
            milestone_multiplier: MILESTONE_MULTIPLIER,
            milestone_cap: MILESTONE_CAP,

            agent: AgentConfig::default(),
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load config from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Invalid config {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Cannot read config {}: {e}", path.display()),
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Panic on a misconfigured config. Clamp ranges and initial values
    /// must be consistent or the difficulty invariants cannot hold.
    pub fn validate(&self) {
        let clamps = &self.clamps;
        for (name, range) in [
            ("difficulty", clamps.difficulty),
            ("scroll_speed", clamps.scroll_speed),
            ("obstacle_freq", clamps.obstacle_freq),
            ("coin_freq", clamps.coin_freq),
            ("reward_band", self.reward_band),
        ] {
            assert!(
                range.min <= range.max,
                "{name} range is inverted: [{}, {}]",
                range.min,
                range.max
            );
        }

        assert!(self.start_lane < LANE_COUNT, "start lane {} out of range", self.start_lane);
        assert!(
            clamps.difficulty.contains(self.init_difficulty),
            "initial difficulty {} outside clamp range",
            self.init_difficulty
        );
        assert!(
            clamps.scroll_speed.contains(self.base_scroll_speed),
            "base scroll speed {} outside clamp range",
            self.base_scroll_speed
        );
        assert!(
            clamps.obstacle_freq.contains(self.init_obstacle_freq),
            "initial obstacle frequency {} outside clamp range",
            self.init_obstacle_freq
        );
        assert!(
            clamps.coin_freq.contains(self.init_coin_freq),
            "initial coin frequency {} outside clamp range",
            self.init_coin_freq
        );
        assert!(self.rl_update_secs > 0.0, "RL cadence must be positive");
        assert!(self.coin_milestone > 0, "coin milestone must be positive");
        assert!(
            (0.0..=1.0).contains(&self.agent.exploration_rate),
            "exploration rate {} outside [0, 1]",
            self.agent.exploration_rate
        );
    }
}
