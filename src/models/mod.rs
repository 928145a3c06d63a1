//! Plain data shared by the games: notes, settings, scoring.

pub mod engine;
pub mod score;
pub mod settings;
pub mod stats;
