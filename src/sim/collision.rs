//! Collision detection and response
//!
//! A forgiving axis-aligned box test between the player and each entity.
//! Coins are collected and resolution continues; the first obstacle hit
//! stops resolution and ends the episode.

use glam::Vec3;

use super::state::{EntityKind, GameState};
use crate::config::Config;

/// What happened during one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    pub coins_collected: u32,
    /// Coin milestones crossed this pass
    pub milestones: u32,
    /// ID of the obstacle that ended the episode
    pub obstacle_hit: Option<u32>,
}

/// Axis-aligned overlap with per-axis half-extents
#[inline]
pub fn overlaps(a: Vec3, b: Vec3, half_extents: Vec3) -> bool {
    let d = (a - b).abs();
    d.x < half_extents.x && d.y < half_extents.y && d.z < half_extents.z
}

/// Resolve player/entity contacts, awarding coins and detecting obstacle hits.
///
/// Mutates score, coin count and the entity list. Difficulty is left to the
/// caller, which gets the number of milestones crossed in the report.
pub fn resolve(state: &mut GameState, player_pos: Vec3, config: &Config) -> CollisionReport {
    let half_extents = Vec3::from_array(config.collision_box);
    let mut report = CollisionReport::default();

    let mut i = 0;
    while i < state.entities.len() {
        let (id, kind, pos) = {
            let e = &state.entities[i];
            (e.id, e.kind, e.pos)
        };
        if !overlaps(player_pos, pos, half_extents) {
            i += 1;
            continue;
        }

        match kind {
            EntityKind::Coin => {
                state.entities.remove(i);
                state.score += config.coin_score;
                state.coins += 1;
                report.coins_collected += 1;
                if state.coins % config.coin_milestone == 0 {
                    report.milestones += 1;
                }
            }
            EntityKind::Obstacle => {
                report.obstacle_hit = Some(id);
                return report;
            }
        }
    }

    report
}
