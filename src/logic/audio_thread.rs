//! Dedicated audio thread that synthesizes tones.
//!
//! Opening the output device and building sources never happens on the logic
//! thread, so a slow or missing device cannot stall a frame.

use crate::system::bus::{AudioCommand, SystemBus};
use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::thread;
use std::time::Duration;

const TONE_DURATION: Duration = Duration::from_millis(500);
const TONE_ATTACK: Duration = Duration::from_millis(50);
/// Peak gain of a tone before the master volume.
const TONE_GAIN: f32 = 0.5;

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    tones_hz: Vec<f32>,
    volume: f32,
}

impl AudioWorker {
    fn new(tones_hz: Vec<f32>, volume: f32) -> Self {
        match OutputStream::try_default() {
            Ok((stream, stream_handle)) => {
                log::info!("AUDIO: Device found, audio enabled");
                Self {
                    _stream: Some(stream),
                    stream_handle: Some(stream_handle),
                    tones_hz,
                    volume,
                }
            }
            Err(e) => {
                log::warn!(
                    "AUDIO: No audio device found ({}), running in silent mode",
                    e
                );
                Self {
                    _stream: None,
                    stream_handle: None,
                    tones_hz,
                    volume,
                }
            }
        }
    }

    /// Returns `false` when the thread should exit.
    fn handle_command(&mut self, cmd: AudioCommand) -> bool {
        match cmd {
            AudioCommand::PlayTone { index } => self.play_tone(index),
            AudioCommand::SetVolume { volume } => self.volume = volume,
            AudioCommand::Shutdown => return false,
        }
        true
    }

    fn play_tone(&self, index: usize) {
        let Some(handle) = &self.stream_handle else {
            return;
        };
        let Some(&freq) = self.tones_hz.get(index) else {
            log::warn!("AUDIO: No tone configured for index {}", index);
            return;
        };

        match Sink::try_new(handle) {
            Ok(sink) => {
                let source = SineWave::new(freq)
                    .take_duration(TONE_DURATION)
                    .fade_in(TONE_ATTACK)
                    .amplify(TONE_GAIN * self.volume);
                sink.append(source);
                sink.detach();
            }
            Err(e) => log::error!("AUDIO: Failed to create sink: {}", e),
        }
    }
}

/// Spawns the audio thread. It exits on `Shutdown`.
/// Plays at full volume until the first `SetVolume`.
pub fn start_audio_thread(bus: SystemBus, tones_hz: Vec<f32>) {
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");
            let mut worker = AudioWorker::new(tones_hz, 1.0);

            while let Ok(cmd) = bus.audio_cmd_rx.recv() {
                if !worker.handle_command(cmd) {
                    break;
                }
            }

            log::info!("AUDIO: Thread stopped");
        })
        .expect("Failed to spawn Audio thread");
}
