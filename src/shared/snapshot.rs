//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of game state sent from the logic thread
//! to the render thread. This decouples game logic from rendering.

use crate::models::stats::Judgement;
use crate::state::echo::EchoStatus;
use crate::state::{ResultData, SessionPhase};

/// High-level render state representing the loaded game.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderState {
    /// Initial empty state.
    Empty,
    /// Falling-note game.
    Rhythm(GameplaySnapshot),
    /// Sequence-repeat game.
    Echo(EchoSnapshot),
}

/// A note to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteView {
    pub lane: usize,
    pub position: f64,
    /// Palette index; notes are colored by lane.
    pub color_key: usize,
}

/// A particle to draw. `x` in lane units, `y` in track units.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleView {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
}

/// Snapshot of rhythm gameplay for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct GameplaySnapshot {
    pub phase: SessionPhase,
    pub lane_labels: Vec<String>,
    pub hit_line: f64,
    pub hit_window: f64,
    pub track_length: f64,

    /// Active notes only.
    pub notes: Vec<NoteView>,
    pub particles: Vec<ParticleView>,

    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub level: u32,
    pub misses: u32,
    /// 0 when the run has no miss limit.
    pub max_misses: u32,

    /// Last judgement (for flash display).
    pub last_judgement: Option<Judgement>,
    /// Set once the run has ended.
    pub result: Option<ResultData>,
}

/// Snapshot of the echo game for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct EchoSnapshot {
    pub phase: SessionPhase,
    pub lane_labels: Vec<String>,
    pub status: EchoStatus,
    /// Pad currently lit by playback or by the player.
    pub lit_pad: Option<usize>,
    /// Round number.
    pub level: u32,
    /// Steps already repeated this round.
    pub progress: usize,
    pub sequence_len: usize,
    pub input_blocked: bool,
    pub score: u64,
    pub combo: u32,
    pub result: Option<ResultData>,
}
