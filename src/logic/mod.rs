//! Logic thread module for game state management and updates.
//!
//! This module contains the main game loop that runs at a fixed frame rate
//! and coordinates between input, audio, and rendering subsystems.

pub mod audio;
pub mod audio_thread;
pub mod clock;

use crate::input::events::GameKind;
use crate::models::settings::GameSettings;
use crate::state::GlobalState;
use crate::system::bus::{SystemBus, SystemEvent};
use clock::FrameClock;
use std::thread;
use std::time::{Duration, Instant};

/// Spawns the main logic thread that handles game state updates.
///
/// This thread runs a fixed-timestep game loop that:
/// 1. Processes input actions from the input thread
/// 2. Handles system events (quit)
/// 3. Updates game state once per due frame
/// 4. Sends render snapshots to the render thread
pub fn start_thread(bus: SystemBus, settings: GameSettings, kind: GameKind, seed: Option<u64>) {
    // Start the dedicated audio thread
    audio_thread::start_audio_thread(bus.clone(), settings.lanes.tones_hz.clone());

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let frame_rate = settings.general.frame_rate;
            let mut state = GlobalState::new(settings, bus.clone(), kind, seed);
            let mut clock = FrameClock::new(frame_rate, Instant::now());

            // First frame so the renderer has something to draw before any tick.
            let _ = bus.render_tx.try_send(state.create_snapshot());

            loop {
                // 1. Process input actions
                while let Ok(action) = bus.action_rx.try_recv() {
                    state.handle_action(action);
                }

                // 2. Handle system events
                while let Ok(sys_evt) = bus.sys_rx.try_recv() {
                    match sys_evt {
                        SystemEvent::Quit => {
                            log::info!("LOGIC: Quit received...");
                            state.shutdown();
                            return;
                        }
                    }
                }

                // 3. Fixed-timestep update loop
                let frames = clock.advance(Instant::now());
                for _ in 0..frames {
                    state.update(&clock.tick());
                }

                // 4. Send render snapshot only if we updated
                if frames > 0 {
                    let _ = bus.render_tx.try_send(state.create_snapshot());
                } else {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        })
        .expect("Failed to spawn Logic thread");
}
