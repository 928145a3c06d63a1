//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` is the only way threads talk to each other. Game state
//! itself never crosses it: the logic thread sends immutable snapshots out and
//! receives actions in.

use crate::input::events::{GameAction, RawInputEvent};
use crate::shared::snapshot::RenderState;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

/// System-level events broadcast to the logic thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Application shutdown requested.
    Quit,
}

/// Commands sent to the dedicated audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Play the synthesized tone assigned to a lane or pad.
    PlayTone { index: usize },
    /// Change volume level.
    SetVolume { volume: f32 },
    /// Stop the audio thread.
    Shutdown,
}

/// Aggregates the cross-thread communication channels.
///
/// - Raw key presses from the render thread
/// - Game actions from the input thread
/// - Render snapshots to the render thread
/// - System events (quit)
/// - Audio commands to the audio thread
#[derive(Clone)]
pub struct SystemBus {
    /// Render → Input: raw key presses.
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    /// Input → Logic: processed gameplay actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Logic → Render: game state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Render → Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Audio: audio commands.
    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,
}

impl SystemBus {
    /// Creates a new system bus with all channels initialized.
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();

        // Bounded render channel: max 2 frames queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();
        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
            audio_cmd_tx,
            audio_cmd_rx,
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
