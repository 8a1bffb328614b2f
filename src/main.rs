//! Adaptive Runner entry point
//!
//! Headless native runner: plays autopilot episodes at 60 Hz and reports how
//! the difficulty controller behaved. Time is simulated unless `--realtime`
//! is given, in which case frames are paced by the wall clock.
//!
//! Usage: `adaptive-runner [--realtime] [config.json|-] [episodes] [seed]`

use adaptive_runner::Config;
use adaptive_runner::platform::{Clock, FixedStepClock, InputQueue, WallClock};
use adaptive_runner::runner::{EpisodeReport, RunOptions, run_session};
use adaptive_runner::sim::Game;

/// Frame length
const FRAME_DT: f64 = 1.0 / 60.0;
/// Episodes are cut off after this many seconds
const MAX_EPISODE_SECS: f32 = 300.0;

const DEFAULT_EPISODES: u32 = 5;
const DEFAULT_SEED: u64 = 0x5eed;

fn main() {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let realtime = match args.iter().position(|a| a == "--realtime") {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    };
    let mut args = args.into_iter();

    let config = match args.next() {
        Some(path) if path != "-" => Config::load(path),
        _ => Config::default(),
    };
    let episodes = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_EPISODES);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    log::info!(
        "Adaptive Runner (headless) starting: {episodes} episodes, seed {seed}, {} time",
        if realtime { "wall" } else { "simulated" }
    );

    let options = RunOptions {
        episodes,
        max_episode_secs: MAX_EPISODE_SECS,
    };
    if realtime {
        play(config, seed, WallClock::new(FRAME_DT), &options);
    } else {
        play(config, seed, FixedStepClock::new(FRAME_DT), &options);
    }
}

fn play<C: Clock>(config: Config, seed: u64, mut clock: C, options: &RunOptions) {
    let mut game = Game::new(config, seed, clock.now());
    let mut input = InputQueue::with_autopilot();
    let scores = run_session(&mut game, &mut clock, &mut input, options, report_episode);

    println!("\nLeaderboard:");
    for (i, entry) in scores.entries.iter().enumerate() {
        println!(
            "{:>2}. {:>8} pts  {:>4} coins  {:>6.1}s  (episode {})",
            i + 1,
            entry.score,
            entry.coins,
            entry.elapsed,
            entry.episode
        );
    }
    if scores.is_empty() {
        println!("  (no scoring episodes)");
    }
}

fn report_episode(report: &EpisodeReport) {
    println!(
        "Episode {}: Score: {}  Coins: {}  {} {:.1}s  RL steps {}  final diff={:.2} speed={:.2} obs_freq={:.3} coin_freq={:.3}",
        report.episode,
        report.summary.score,
        report.summary.coins,
        if report.cut_off { "cut off at" } else { "survived" },
        report.summary.elapsed,
        report.rl_steps,
        report.params.difficulty,
        report.params.scroll_speed,
        report.params.obstacle_freq,
        report.params.coin_freq,
    );
}
