//! Per-tick game loop
//!
//! `Game` owns everything one episode mutates and advances it in a fixed
//! order: input, physics, scroll, spawn, collisions, difficulty control,
//! score. Time comes from the caller so a fake clock makes runs exact.

use rand_pcg::Pcg32;

use super::agent::RlAgent;
use super::collision;
use super::difficulty::{ControllerStep, DifficultyController};
use super::frame::Frame;
use super::spawn;
use super::state::{GamePhase, GameState, RngState, episode_seed};
use crate::LANE_COUNT;
use crate::config::Config;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Start a new episode (only honoured after game over)
    pub restart: bool,
    /// Demo mode - the built-in pilot plays
    pub autopilot: bool,
}

/// Stream the agent's exploration RNG is drawn from
const AGENT_STREAM: u64 = 1;

/// The game loop and sole owner of all mutable game state
pub struct Game {
    config: Config,
    base_seed: u64,
    episode: u32,
    state: GameState,
    controller: DifficultyController,
    agent: RlAgent,
    rng: Pcg32,
    start_time: f64,
    last_step: Option<ControllerStep>,
}

impl Game {
    /// Start the first episode of a session at time `now` (seconds)
    pub fn new(config: Config, seed: u64, now: f64) -> Self {
        config.validate();
        let episode_seed = episode_seed(seed, 0);
        let rng_state = RngState::new(episode_seed);
        log::info!("Episode 0 starting (seed {episode_seed:#x})");

        Self {
            state: GameState::new(episode_seed, &config),
            controller: DifficultyController::new(now),
            agent: RlAgent::new(&config.agent, rng_state.fork(AGENT_STREAM).to_rng()),
            rng: rng_state.to_rng(),
            config,
            base_seed: seed,
            episode: 0,
            start_time: now,
            last_step: None,
        }
    }

    /// Throw the episode away and start over with a fresh agent
    pub fn restart(&mut self, now: f64) {
        self.episode += 1;
        let seed = episode_seed(self.base_seed, self.episode);
        let rng_state = RngState::new(seed);
        log::info!("Episode {} starting (seed {seed:#x})", self.episode);

        self.state = GameState::new(seed, &self.config);
        self.controller = DifficultyController::new(now);
        self.agent = RlAgent::new(&self.config.agent, rng_state.fork(AGENT_STREAM).to_rng());
        self.rng = rng_state.to_rng();
        self.start_time = now;
        self.last_step = None;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn agent(&self) -> &RlAgent {
        &self.agent
    }

    pub fn controller(&self) -> &DifficultyController {
        &self.controller
    }

    /// Episodes started before the current one
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Controller step taken during the most recent tick, if any
    pub fn last_step(&self) -> Option<&ControllerStep> {
        self.last_step.as_ref()
    }

    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state, &self.config.lanes)
    }

    /// Advance one tick at time `now` and return what to display
    pub fn tick(&mut self, input: &TickInput, now: f64) -> Frame {
        self.last_step = None;

        if self.state.game_over() {
            if input.restart {
                self.restart(now);
            }
            return self.frame();
        }

        let input = if input.autopilot {
            autopilot_input(&self.state, &self.config)
        } else {
            input.clone()
        };

        let config = &self.config;
        let state = &mut self.state;
        state.time_ticks += 1;
        state.elapsed = (now - self.start_time) as f32;

        // Lane changes and jumps queued since the last tick
        if input.move_left {
            state.player.move_left();
        }
        if input.move_right {
            state.player.move_right();
        }
        if input.jump {
            state
                .player
                .jump(config.ground_height, config.jump_tolerance, config.jump_force);
        }

        state.player.integrate(config.gravity, config.ground_height);

        let move_speed = state.params.move_speed();
        state.scroll_entities(move_speed, config.removal_threshold);

        self.controller.advance_phase(state.elapsed, config);
        let obstacle_p = self.controller.obstacle_frequency(&state.params, config) * state.params.difficulty;
        let coin_p = state.params.coin_freq;
        spawn::maybe_spawn_obstacle(state, &mut self.rng, obstacle_p, config);
        spawn::maybe_spawn_coin(state, &mut self.rng, coin_p, config);

        let player_pos = state.player.position(&config.lanes);
        let report = collision::resolve(state, player_pos, config);
        for _ in 0..report.milestones {
            DifficultyController::apply_coin_milestone(&mut state.params, config);
        }
        if let Some(id) = report.obstacle_hit {
            state.phase = GamePhase::GameOver;
            log::info!(
                "Game over: hit obstacle {id} after {:.1}s, score {}, coins {}",
                state.elapsed,
                state.display_score(),
                state.coins
            );
            return self.frame();
        }

        self.last_step = self.controller.step(
            now,
            state.score,
            &mut state.params,
            &mut self.agent,
            config,
        );

        state.score += state.params.difficulty * config.score_per_tick;

        self.frame()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// How far ahead the pilot looks for obstacles in its lane
const PILOT_LOOKAHEAD: f32 = 6.0;
/// Jump once the obstacle is this close
const PILOT_JUMP_DISTANCE: f32 = 2.0;

/// Built-in pilot: sidestep obstacles, jump when boxed in, chase coins
pub fn autopilot_input(state: &GameState, config: &Config) -> TickInput {
    let lane = state.player.lane;
    let mut input = TickInput::default();

    let lane_is_safe = |l: usize| {
        !state
            .entities
            .iter()
            .any(|e| e.is_obstacle() && e.lane == l && e.pos.y > -config.collision_box[1] && e.pos.y < PILOT_LOOKAHEAD)
    };

    // Nearest obstacle ahead in the current lane
    let threat = state
        .entities
        .iter()
        .filter(|e| e.is_obstacle() && e.lane == lane && e.pos.y > -config.collision_box[1] && e.pos.y < PILOT_LOOKAHEAD)
        .map(|e| e.pos.y)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(distance) = threat {
        if lane > 0 && lane_is_safe(lane - 1) {
            input.move_left = true;
        } else if lane + 1 < LANE_COUNT && lane_is_safe(lane + 1) {
            input.move_right = true;
        } else if distance < PILOT_JUMP_DISTANCE {
            input.jump = true;
        }
        return input;
    }

    // Nothing to dodge: drift toward the nearest coin in a safe lane
    let coin_lane = state
        .entities
        .iter()
        .filter(|e| !e.is_obstacle() && e.pos.y > 0.0)
        .min_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal))
        .map(|e| e.lane);

    if let Some(target) = coin_lane {
        if target < lane && lane_is_safe(lane - 1) {
            input.move_left = true;
        } else if target > lane && lane_is_safe(lane + 1) {
            input.move_right = true;
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Range;
    use crate::platform::{Clock, FixedStepClock};
    use crate::sim::difficulty::ControllerPhase;
    use crate::sim::state::{Entity, EntityKind};
    use glam::Vec3;

    const DT: f64 = 1.0 / 60.0;

    /// Config with spawning switched off so scenarios control every entity
    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.clamps.obstacle_freq = Range::new(0.0, 0.0);
        config.init_obstacle_freq = 0.0;
        config.clamps.coin_freq = Range::new(0.0, 0.0);
        config.init_coin_freq = 0.0;
        config
    }

    fn place(game: &mut Game, kind: EntityKind, lane: usize, y: f32, z: f32) {
        let x = game.config().lanes[lane];
        let state = game.state_mut();
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind,
            lane,
            pos: Vec3::new(x, y, z),
        });
    }

    #[test]
    fn test_obstacle_collision_ends_episode() {
        let mut game = Game::new(quiet_config(), 7, 0.0);
        game.tick(&TickInput::default(), DT);
        let score = game.state().score;
        let coins = game.state().coins;
        assert_eq!(game.state().player.lane, 1);

        // Lands inside the box after this tick's scroll
        place(&mut game, EntityKind::Obstacle, 1, 0.1, 2.0);
        let frame = game.tick(&TickInput::default(), 2.0 * DT);

        assert!(game.state().game_over());
        assert_eq!(game.state().score, score);
        assert_eq!(game.state().coins, coins);
        let summary = frame.game_over.unwrap();
        assert_eq!(summary.score, score as u64);
        assert_eq!(summary.coins, coins);
    }

    #[test]
    fn test_game_over_freezes_ticks() {
        let mut game = Game::new(quiet_config(), 7, 0.0);
        place(&mut game, EntityKind::Obstacle, 1, 0.1, 2.0);
        game.tick(&TickInput::default(), DT);
        assert!(game.state().game_over());

        let ticks = game.state().time_ticks;
        let entities = game.state().entities.len();
        let input = TickInput {
            move_left: true,
            jump: true,
            ..Default::default()
        };
        for i in 0..10 {
            game.tick(&input, (2 + i) as f64 * DT);
        }
        assert_eq!(game.state().time_ticks, ticks);
        assert_eq!(game.state().entities.len(), entities);
        assert_eq!(game.state().player.lane, 1);
    }

    #[test]
    fn test_restart_resets_fully() {
        let mut game = Game::new(Config::default(), 11, 0.0);
        let mut clock = FixedStepClock::new(DT);
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            game.tick(&autopilot, clock.advance());
        }
        let ground = game.config().ground_height;
        while !game.state().game_over() {
            let lane = game.state().player.lane;
            place(&mut game, EntityKind::Obstacle, lane, 0.0, ground);
            game.tick(&TickInput::default(), clock.advance());
        }

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        game.tick(&restart, clock.advance());

        let config = Config::default();
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.coins, 0);
        assert_eq!(state.params.difficulty, 1.0);
        assert_eq!(state.params.scroll_speed, config.base_scroll_speed);
        assert_eq!(state.params.obstacle_freq, config.init_obstacle_freq);
        assert_eq!(state.params.coin_freq, config.init_coin_freq);
        assert!(state.entities.is_empty());
        assert_eq!(state.player.lane, config.start_lane);
        assert!(game.agent().last_state().is_none());
        assert!(game.agent().weights().iter().flatten().all(|&w| w == 0.0));
        assert_eq!(game.controller().phase(), ControllerPhase::Warmup);
        assert_eq!(game.episode(), 1);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut game = Game::new(quiet_config(), 3, 0.0);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        game.tick(&restart, DT);
        assert_eq!(game.episode(), 0);
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_no_rl_during_warmup() {
        let mut game = Game::new(Config::default(), 5, 0.0);
        let mut clock = FixedStepClock::new(DT);
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // Just short of ten seconds
        for _ in 0..599 {
            game.tick(&autopilot, clock.advance());
            if game.state().game_over() {
                break;
            }
            assert!(game.last_step().is_none());
        }
        assert_eq!(game.controller().steps(), 0);
        assert!(game.agent().last_state().is_none());
    }

    #[test]
    fn test_rl_steps_once_per_second_after_warmup() {
        let mut game = Game::new(quiet_config(), 5, 0.0);
        let mut clock = FixedStepClock::new(DT);
        let mut steps = 0;
        // 15 simulated seconds
        for _ in 0..900 {
            game.tick(&TickInput::default(), clock.advance());
            if game.last_step().is_some() {
                steps += 1;
                assert!(game.state().elapsed >= 10.0);
            }
        }
        assert!(!game.state().game_over());
        assert_eq!(steps, game.controller().steps());
        assert!((4..=6).contains(&steps));
        assert!(game.state().params.within(&game.config().clamps));
    }

    #[test]
    fn test_score_accrues_with_difficulty() {
        let mut game = Game::new(quiet_config(), 9, 0.0);
        for i in 1..=10 {
            game.tick(&TickInput::default(), i as f64 * DT);
        }
        assert!((game.state().score - 5.0).abs() < 1e-4);
        assert_eq!(game.frame().score, 5);
    }

    #[test]
    fn test_lane_change_one_step_per_tick() {
        let mut game = Game::new(quiet_config(), 1, 0.0);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        game.tick(&left, DT);
        assert_eq!(game.state().player.lane, 0);
        game.tick(&left, 2.0 * DT);
        assert_eq!(game.state().player.lane, 0);
        let frame = game.frame();
        assert_eq!(frame.player.x, game.config().lanes[0]);
    }

    #[test]
    fn test_jump_then_land() {
        let mut game = Game::new(quiet_config(), 1, 0.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        game.tick(&jump, DT);
        assert!(game.state().player.height > game.config().ground_height);

        // Mid-air jumps are ignored
        let vz = game.state().player.vertical_velocity;
        game.tick(&jump, 2.0 * DT);
        assert!(game.state().player.vertical_velocity < vz);

        for i in 0..60 {
            game.tick(&TickInput::default(), (3 + i) as f64 * DT);
        }
        assert_eq!(game.state().player.height, game.config().ground_height);
    }

    #[test]
    fn test_jump_over_obstacle() {
        let mut game = Game::new(quiet_config(), 1, 0.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        game.tick(&jump, DT);
        game.tick(&TickInput::default(), 2.0 * DT);
        place(&mut game, EntityKind::Obstacle, 1, 0.1, 2.0);
        game.tick(&TickInput::default(), 3.0 * DT);
        assert!(!game.state().game_over());
    }

    #[test]
    fn test_fiftieth_coin_bumps_difficulty_once() {
        let mut game = Game::new(quiet_config(), 2, 0.0);
        for i in 0..50 {
            place(&mut game, EntityKind::Coin, 1, 0.1, 2.4);
            game.tick(&TickInput::default(), (i + 1) as f64 * DT);
        }
        assert_eq!(game.state().coins, 50);
        assert!((game.state().params.difficulty - 1.2).abs() < 1e-6);

        place(&mut game, EntityKind::Coin, 1, 0.1, 2.4);
        game.tick(&TickInput::default(), 51.0 * DT);
        assert_eq!(game.state().coins, 51);
        assert!((game.state().params.difficulty - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_run() {
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut a = Game::new(Config::default(), 99, 0.0);
        let mut b = Game::new(Config::default(), 99, 0.0);
        for i in 1..=1500 {
            let now = i as f64 * DT;
            let fa = a.tick(&autopilot, now);
            let fb = b.tick(&autopilot, now);
            assert_eq!(fa.entities, fb.entities);
            assert_eq!(fa.score, fb.score);
        }
        assert_eq!(a.agent().weights(), b.agent().weights());
    }

    #[test]
    fn test_autopilot_sidesteps() {
        let config = quiet_config();
        let mut state = GameState::new(0, &config);
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind: EntityKind::Obstacle,
            lane: 1,
            pos: Vec3::new(0.0, 3.0, 2.0),
        });
        let input = autopilot_input(&state, &config);
        assert!(input.move_left);
        assert!(!input.jump);
    }

    #[test]
    fn test_autopilot_jumps_when_boxed_in() {
        let config = quiet_config();
        let mut state = GameState::new(0, &config);
        for lane in 0..LANE_COUNT {
            let id = state.next_entity_id();
            state.entities.push(Entity {
                id,
                kind: EntityKind::Obstacle,
                lane,
                pos: Vec3::new(config.lanes[lane], 1.5, 2.0),
            });
        }
        let input = autopilot_input(&state, &config);
        assert!(input.jump);
        assert!(!input.move_left && !input.move_right);
    }
}
