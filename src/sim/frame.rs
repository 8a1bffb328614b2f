//! Per-tick snapshot handed to the presentation layer
//!
//! The entity list is the single source of truth; a renderer reconciles its
//! own drawables against the IDs here each frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{DifficultyParams, EntityKind, GameState};
use crate::LANE_COUNT;

/// Something to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: usize,
    pub pos: Vec3,
}

/// Final result of an episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub score: u64,
    pub coins: u32,
    /// Seconds survived
    pub elapsed: f32,
}

/// Everything the presentation layer needs to show one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub entities: Vec<Drawable>,
    pub player: Vec3,
    pub score: u64,
    pub coins: u32,
    pub elapsed: f32,
    pub params: DifficultyParams,
    /// Set once the episode has ended
    pub game_over: Option<EpisodeSummary>,
}

impl Frame {
    pub fn capture(state: &GameState, lanes: &[f32; LANE_COUNT]) -> Self {
        Self {
            entities: state
                .entities
                .iter()
                .map(|e| Drawable {
                    id: e.id,
                    kind: e.kind,
                    lane: e.lane,
                    pos: e.pos,
                })
                .collect(),
            player: state.player.position(lanes),
            score: state.display_score(),
            coins: state.coins,
            elapsed: state.elapsed,
            params: state.params,
            game_over: state.game_over().then(|| EpisodeSummary {
                score: state.display_score(),
                coins: state.coins,
                elapsed: state.elapsed,
            }),
        }
    }

    /// Episode result as of this frame, whether or not it has ended
    pub fn summary(&self) -> EpisodeSummary {
        self.game_over.unwrap_or(EpisodeSummary {
            score: self.score,
            coins: self.coins,
            elapsed: self.elapsed,
        })
    }

    /// HUD text, e.g. `Score: 120  Coins: 1`
    pub fn hud(&self) -> String {
        format!("Score: {}  Coins: {}", self.score, self.coins)
    }
}
