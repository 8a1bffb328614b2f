//! Game state and core simulation types
//!
//! Everything one episode mutates lives here. Positions use the track frame:
//! x is lateral (lane offset), y is longitudinal (distance ahead of the
//! player), z is height.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{Clamps, Config};
use crate::{LANE_COUNT, lane_offset};

/// Current phase of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player hit an obstacle; only restart leaves this phase
    GameOver,
}

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Coin,
}

/// An obstacle or coin scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: usize,
    pub pos: Vec3,
}

impl Entity {
    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.kind == EntityKind::Obstacle
    }
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane index in `0..LANE_COUNT`
    pub lane: usize,
    /// Height above the track (never below ground)
    pub height: f32,
    pub vertical_velocity: f32,
}

impl Player {
    pub fn new(lane: usize, ground: f32) -> Self {
        assert!(lane < LANE_COUNT, "lane index {lane} out of range");
        Self {
            lane,
            height: ground,
            vertical_velocity: 0.0,
        }
    }

    /// World position; the player always sits at longitudinal 0
    pub fn position(&self, lanes: &[f32; LANE_COUNT]) -> Vec3 {
        Vec3::new(lane_offset(lanes, self.lane), 0.0, self.height)
    }

    pub fn move_left(&mut self) {
        self.lane = self.lane.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.lane = (self.lane + 1).min(LANE_COUNT - 1);
    }

    pub fn on_ground(&self, ground: f32, tolerance: f32) -> bool {
        self.height <= ground + tolerance
    }

    /// Start a jump if grounded. Returns whether the jump was accepted.
    pub fn jump(&mut self, ground: f32, tolerance: f32, impulse: f32) -> bool {
        if self.on_ground(ground, tolerance) {
            self.vertical_velocity = impulse;
            true
        } else {
            false
        }
    }

    /// One tick of vertical motion: gravity, integrate, land
    pub fn integrate(&mut self, gravity: f32, ground: f32) {
        self.vertical_velocity += gravity;
        self.height += self.vertical_velocity;
        if self.height < ground {
            self.height = ground;
            self.vertical_velocity = 0.0;
        }
    }
}

/// Parameters the difficulty controller tunes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    pub difficulty: f32,
    pub scroll_speed: f32,
    pub obstacle_freq: f32,
    pub coin_freq: f32,
}

impl DifficultyParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            difficulty: config.init_difficulty,
            scroll_speed: config.base_scroll_speed,
            obstacle_freq: config.init_obstacle_freq,
            coin_freq: config.init_coin_freq,
        }
    }

    pub fn clamp(&mut self, clamps: &Clamps) {
        self.difficulty = clamps.difficulty.clamp(self.difficulty);
        self.scroll_speed = clamps.scroll_speed.clamp(self.scroll_speed);
        self.obstacle_freq = clamps.obstacle_freq.clamp(self.obstacle_freq);
        self.coin_freq = clamps.coin_freq.clamp(self.coin_freq);
    }

    pub fn within(&self, clamps: &Clamps) -> bool {
        clamps.difficulty.contains(self.difficulty)
            && clamps.scroll_speed.contains(self.scroll_speed)
            && clamps.obstacle_freq.contains(self.obstacle_freq)
            && clamps.coin_freq.contains(self.coin_freq)
    }

    /// Longitudinal distance entities travel per tick
    #[inline]
    pub fn move_speed(&self) -> f32 {
        self.scroll_speed * self.difficulty
    }
}

/// Seed bookkeeping for reproducible episodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream.wrapping_mul(2).wrapping_add(1))
    }

    /// Seed on a separate stream, for a second independent consumer
    pub fn fork(&self, stream: u64) -> Self {
        Self {
            seed: self.seed,
            stream,
        }
    }
}

/// Seed for the nth episode of a session
pub fn episode_seed(base_seed: u64, episode: u32) -> u64 {
    let mut rng = Pcg32::seed_from_u64(base_seed.wrapping_add(episode as u64));
    rand::RngCore::next_u64(&mut rng)
}

/// Complete state of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Episode seed
    pub seed: u64,
    pub player: Player,
    /// Accumulated score (truncated for display)
    pub score: f32,
    pub coins: u32,
    /// Seconds since the episode started
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Live obstacles and coins, in spawn order
    pub entities: Vec<Entity>,
    pub params: DifficultyParams,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, config: &Config) -> Self {
        Self {
            seed,
            player: Player::new(config.start_lane, config.ground_height),
            score: 0.0,
            coins: 0,
            elapsed: 0.0,
            time_ticks: 0,
            phase: GamePhase::Running,
            entities: Vec::new(),
            params: DifficultyParams::from_config(config),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Score as shown to the player
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score as u64
    }

    /// Move every entity toward the player and drop the ones left behind
    pub fn scroll_entities(&mut self, distance: f32, removal_threshold: f32) {
        for entity in &mut self.entities {
            entity.pos.y -= distance;
        }
        self.entities.retain(|e| e.pos.y >= removal_threshold);
    }
}
