//! Obstacle and coin spawning
//!
//! Spawns are Bernoulli trials against the current frequencies. Obstacles
//! obey one rule: a row never blocks every lane, so the player always has a
//! way through.

use glam::Vec3;
use rand::Rng;

use super::state::{Entity, EntityKind, GameState};
use crate::config::Config;
use crate::{LANE_COUNT, lane_offset};

/// Lanes occupied by obstacles within `window` of longitudinal `y`
pub fn blocked_lanes(entities: &[Entity], y: f32, window: f32) -> [bool; LANE_COUNT] {
    let mut blocked = [false; LANE_COUNT];
    for entity in entities {
        if entity.is_obstacle() && (entity.pos.y - y).abs() < window {
            blocked[entity.lane] = true;
        }
    }
    blocked
}

fn push_entity(state: &mut GameState, kind: EntityKind, lane: usize, y: f32, z: f32, config: &Config) -> u32 {
    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind,
        lane,
        pos: Vec3::new(lane_offset(&config.lanes, lane), y, z),
    });
    id
}

/// Maybe add an obstacle at the spawn distance.
///
/// Skips the spawn when two or more distinct lanes are already blocked
/// nearby. Returns the new entity's ID.
pub fn maybe_spawn_obstacle<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    probability: f32,
    config: &Config,
) -> Option<u32> {
    if rng.random::<f32>() >= probability {
        return None;
    }

    let y = config.spawn_distance;
    let blocked = blocked_lanes(&state.entities, y, config.row_window);
    if blocked.iter().filter(|&&b| b).count() >= LANE_COUNT - 1 {
        log::trace!("Skipping obstacle spawn, row already has {} blocked lanes", LANE_COUNT - 1);
        return None;
    }

    let lane = rng.random_range(0..LANE_COUNT);
    Some(push_entity(state, EntityKind::Obstacle, lane, y, config.obstacle_height, config))
}

/// Maybe add a coin at the spawn distance. Coins never block anything.
pub fn maybe_spawn_coin<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    probability: f32,
    config: &Config,
) -> Option<u32> {
    if rng.random::<f32>() >= probability {
        return None;
    }

    let lane = rng.random_range(0..LANE_COUNT);
    Some(push_entity(state, EntityKind::Coin, lane, config.spawn_distance, config.coin_height, config))
}
