//! State management module.
//!
//! - `RhythmEngine` - falling-note gameplay
//! - `EchoGame` - sequence-repeat memory game
//! - `GlobalState` - owns whichever game is loaded and routes actions to it
//!
//! Each game implements the common traits for lifecycle, snapshots, updates
//! and action handling.

pub mod echo;
pub mod game;
pub mod global;
pub mod traits;

use crate::input::events::GameKind;
use crate::models::stats::HitStats;

// Re-exports for convenient access
pub use echo::EchoGame;
pub use game::RhythmEngine;
pub use global::GlobalState;
pub use traits::{HandleAction, Session, Snapshot, Transition, Update};

/// Lifecycle phase shared by both games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    Ended,
}

/// Final numbers of a finished session, kept for the result display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultData {
    pub game: GameKind,
    pub score: u64,
    pub max_combo: u32,
    /// Difficulty level (rhythm) or round reached (echo).
    pub level: u32,
    pub hit_stats: HitStats,
}

impl ResultData {
    pub fn accuracy(&self) -> f64 {
        self.hit_stats.calculate_accuracy()
    }
}
