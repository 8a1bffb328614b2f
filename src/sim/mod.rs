//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod agent;
pub mod collision;
pub mod difficulty;
pub mod frame;
pub mod spawn;
pub mod state;
pub mod tick;

pub use agent::{FEATURE_COUNT, Features, RlAgent};
pub use collision::{CollisionReport, resolve};
pub use difficulty::{ControllerPhase, ControllerStep, DifficultyAction, DifficultyController};
pub use frame::{Drawable, EpisodeSummary, Frame};
pub use state::{DifficultyParams, Entity, EntityKind, GamePhase, GameState, Player};
pub use tick::{Game, TickInput, autopilot_input};
