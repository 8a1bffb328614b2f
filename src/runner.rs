//! Session runner
//!
//! Drives a `Game` from a clock and an input queue for a number of episodes,
//! restarting after each one and ranking them on a leaderboard.

use crate::highscores::HighScores;
use crate::platform::{Clock, InputEvent, InputQueue};
use crate::sim::{DifficultyParams, EpisodeSummary, Frame, Game};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub episodes: u32,
    /// Episodes still running after this many seconds are ended and scored
    pub max_episode_secs: f32,
}

/// How one episode ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    pub episode: u32,
    pub summary: EpisodeSummary,
    /// Controller steps taken during the episode
    pub rl_steps: u32,
    pub params: DifficultyParams,
    /// Survived to the time limit rather than crashing
    pub cut_off: bool,
    /// Leaderboard rank, if it made the board
    pub rank: Option<usize>,
}

/// Play `options.episodes` episodes, calling `on_episode` as each one ends.
///
/// Stops early if the queue reports a quit.
pub fn run_session<C: Clock>(
    game: &mut Game,
    clock: &mut C,
    input: &mut InputQueue,
    options: &RunOptions,
    mut on_episode: impl FnMut(&EpisodeReport),
) -> HighScores {
    let mut scores = HighScores::new();
    let mut finished = 0;
    let mut frames: u64 = 0;

    while finished < options.episodes {
        let drained = input.drain();
        if drained.quit {
            log::info!("Quit requested");
            break;
        }

        let now = clock.advance();
        let frame = game.tick(&drained.input, now);
        frames += 1;

        if frame.game_over.is_some() {
            on_episode(&finish_episode(game, &frame, &mut scores, false));
            input.push(InputEvent::Restart);
            finished += 1;
        } else if frame.elapsed >= options.max_episode_secs {
            log::info!(
                "Episode {} survived {:.0}s, cutting it off",
                game.episode(),
                options.max_episode_secs
            );
            on_episode(&finish_episode(game, &frame, &mut scores, true));
            game.restart(now);
            finished += 1;
        } else if frames % 600 == 0 {
            log::debug!("{} (t={:.0}s)", frame.hud(), frame.elapsed);
        }
    }

    if let Some(best) = scores.top() {
        log::info!("Best episode {}: {} pts", best.episode, best.score);
    }
    scores
}

fn finish_episode(game: &Game, frame: &Frame, scores: &mut HighScores, cut_off: bool) -> EpisodeReport {
    let summary = frame.summary();
    let rank = scores.record(&summary, game.episode());
    if let Some(rank) = rank {
        log::info!("New leaderboard entry at rank {rank}");
    }
    EpisodeReport {
        episode: game.episode(),
        summary,
        rl_steps: game.controller().steps(),
        params: frame.params,
        cut_off,
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::platform::FixedStepClock;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_cut_off_episodes_are_ranked() {
        // Nothing spawned can scroll into the player within two seconds
        let mut game = Game::new(Config::default(), 9, 0.0);
        let mut clock = FixedStepClock::new(DT);
        let mut input = InputQueue::with_autopilot();
        let options = RunOptions {
            episodes: 3,
            max_episode_secs: 2.0,
        };

        let mut reports = Vec::new();
        let scores = run_session(&mut game, &mut clock, &mut input, &options, |r| reports.push(*r));

        assert_eq!(reports.len(), 3);
        assert_eq!(game.episode(), 3);
        for (i, report) in reports.iter().enumerate() {
            assert!(report.cut_off);
            assert_eq!(report.episode, i as u32);
            assert!(report.summary.score > 0);
            assert!(report.summary.elapsed >= 2.0);
            assert!(report.rank.is_some());
        }
        assert_eq!(scores.entries.len(), 3);
        assert!(scores.top().is_some_and(|best| best.score >= reports[0].summary.score));
    }

    #[test]
    fn test_crashed_episodes_are_ranked() {
        // Standing still in the middle lane loses eventually
        let mut game = Game::new(Config::default(), 1, 0.0);
        let mut clock = FixedStepClock::new(DT);
        let mut input = InputQueue::new();
        let options = RunOptions {
            episodes: 2,
            max_episode_secs: 1800.0,
        };

        let mut reports = Vec::new();
        let scores = run_session(&mut game, &mut clock, &mut input, &options, |r| reports.push(*r));

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.cut_off));
        assert_eq!(reports[1].episode, 1);
        assert_eq!(scores.entries.len(), 2);
    }

    #[test]
    fn test_quit_stops_session() {
        let mut game = Game::new(Config::default(), 3, 0.0);
        let mut clock = FixedStepClock::new(DT);
        let mut input = InputQueue::with_autopilot();
        input.push(InputEvent::Quit);
        let options = RunOptions {
            episodes: 5,
            max_episode_secs: 60.0,
        };

        let scores = run_session(&mut game, &mut clock, &mut input, &options, |_| {
            panic!("no episode should finish")
        });
        assert!(scores.is_empty());
        assert_eq!(clock.ticks(), 0);
    }
}
