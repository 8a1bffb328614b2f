//! RL-driven difficulty controller
//!
//! Holds difficulty easy during warmup, then once per cadence interval samples
//! the game, asks the agent for an action, applies it, clamps, and feeds the
//! reward back.

use serde::{Deserialize, Serialize};

use super::agent::{Features, RlAgent};
use super::state::DifficultyParams;
use crate::config::Config;

/// Parameter nudges the agent can choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyAction {
    /// difficulty -= 0.05
    Easier,
    /// scroll_speed += 0.02
    FasterScroll,
    /// obstacle_freq += 0.01
    MoreObstacles,
    /// coin_freq -= 0.01
    FewerCoins,
    /// obstacle_freq += 0.015
    ManyMoreObstacles,
    /// coin_freq += 0.015
    MoreCoins,
    /// difficulty += 0.05
    Harder,
}

impl DifficultyAction {
    pub const COUNT: usize = 7;

    /// All actions in index order
    pub const ALL: [DifficultyAction; Self::COUNT] = [
        Self::Easier,
        Self::FasterScroll,
        Self::MoreObstacles,
        Self::FewerCoins,
        Self::ManyMoreObstacles,
        Self::MoreCoins,
        Self::Harder,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Easier => 0,
            Self::FasterScroll => 1,
            Self::MoreObstacles => 2,
            Self::FewerCoins => 3,
            Self::ManyMoreObstacles => 4,
            Self::MoreCoins => 5,
            Self::Harder => 6,
        }
    }

    /// Apply the additive delta (unclamped)
    pub fn apply(self, params: &mut DifficultyParams) {
        match self {
            Self::Easier => params.difficulty -= 0.05,
            Self::FasterScroll => params.scroll_speed += 0.02,
            Self::MoreObstacles => params.obstacle_freq += 0.01,
            Self::FewerCoins => params.coin_freq -= 0.01,
            Self::ManyMoreObstacles => params.obstacle_freq += 0.015,
            Self::MoreCoins => params.coin_freq += 0.015,
            Self::Harder => params.difficulty += 0.05,
        }
    }
}

/// Controller phase within an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// Easy start, RL disabled
    Warmup,
    /// RL steps at the configured cadence
    Active,
}

/// Record of one controller step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerStep {
    pub state: Features,
    pub action: DifficultyAction,
    pub reward: f32,
    pub params: DifficultyParams,
}

/// Build the agent's feature vector
pub fn features(params: &DifficultyParams, score: f32) -> Features {
    [
        params.difficulty,
        score / 10_000.0,
        params.scroll_speed,
        params.obstacle_freq,
        params.coin_freq,
    ]
}

pub struct DifficultyController {
    phase: ControllerPhase,
    /// Time of the last step (or of controller creation)
    last_update: f64,
    /// Agent steps taken this episode
    steps: u32,
}

impl DifficultyController {
    /// New controller for an episode starting at `now` (seconds)
    pub fn new(now: f64) -> Self {
        Self {
            phase: ControllerPhase::Warmup,
            last_update: now,
            steps: 0,
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    /// Number of agent updates issued this episode
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Obstacle spawn frequency after warmup dampening
    pub fn obstacle_frequency(&self, params: &DifficultyParams, config: &Config) -> f32 {
        match self.phase {
            ControllerPhase::Warmup => params.obstacle_freq * config.warmup_dampening,
            ControllerPhase::Active => params.obstacle_freq,
        }
    }

    /// Leave warmup once `elapsed` reaches the warmup duration. One-way.
    pub fn advance_phase(&mut self, elapsed: f32, config: &Config) {
        if self.phase == ControllerPhase::Warmup && elapsed >= config.warmup_secs {
            log::debug!("Warmup over after {elapsed:.2}s, RL controller active");
            self.phase = ControllerPhase::Active;
        }
    }

    /// Reward for the current difficulty
    pub fn reward(params: &DifficultyParams, config: &Config) -> f32 {
        if config.reward_band.contains(params.difficulty) {
            1.0
        } else {
            -1.0
        }
    }

    /// Run one controller step if out of warmup and the cadence allows it.
    ///
    /// `now` is the monotonic clock in seconds. The phase is whatever the last
    /// `advance_phase` left it at; the game loop advances it once per tick.
    pub fn step(
        &mut self,
        now: f64,
        score: f32,
        params: &mut DifficultyParams,
        agent: &mut RlAgent,
        config: &Config,
    ) -> Option<ControllerStep> {
        if self.phase == ControllerPhase::Warmup {
            return None;
        }
        if now - self.last_update < config.rl_update_secs as f64 {
            return None;
        }

        let state = features(params, score);
        let action = agent.choose_action(&state);
        action.apply(params);
        params.clamp(&config.clamps);

        let reward = Self::reward(params, config);
        agent.record(&state, action);
        agent.update(&state, reward);
        self.last_update = now;
        self.steps += 1;

        log::info!(
            "[RL] action={}, diff={:.2}, speed={:.2}, obs_freq={:.3}, coin_freq={:.3}",
            action.index(),
            params.difficulty,
            params.scroll_speed,
            params.obstacle_freq,
            params.coin_freq,
        );

        Some(ControllerStep {
            state,
            action,
            reward,
            params: *params,
        })
    }

    /// Coin milestone bump, outside the RL loop
    pub fn apply_coin_milestone(params: &mut DifficultyParams, config: &Config) {
        params.difficulty = (params.difficulty * config.milestone_multiplier).min(config.milestone_cap);
        log::debug!("Coin milestone, difficulty now {:.2}", params.difficulty);
    }
}
