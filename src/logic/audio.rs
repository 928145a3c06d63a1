//! Audio manager that sends commands to the dedicated audio thread.

use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::Sender;

/// Fire-and-forget handle for tone playback.
///
/// Games never wait on audio: commands go through a channel and a send
/// failure (audio thread gone) is ignored.
#[derive(Clone)]
pub struct AudioManager {
    cmd_tx: Sender<AudioCommand>,
}

impl AudioManager {
    /// Creates a new audio manager connected to the system bus.
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
        }
    }

    /// Plays the tone for a lane or pad.
    pub fn play_tone(&self, index: usize) {
        let _ = self.cmd_tx.send(AudioCommand::PlayTone { index });
    }

    /// Sets the master volume (0.0 to 1.0).
    pub fn set_volume(&self, volume: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetVolume {
            volume: volume.clamp(0.0, 1.0),
        });
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
    }
}
