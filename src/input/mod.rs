//! Input thread bootstrapping and high-level event routing.

pub mod events;
pub mod keycode;
pub mod manager;

use crate::input::events::RawInputEvent;
use crate::input::manager::InputManager;
use crate::models::settings::GameSettings;
use crate::system::bus::SystemBus;
use crossterm::event::KeyCode;
use std::path::PathBuf;
use std::thread;

/// Re-reads keybinds from the settings file.
const RELOAD_KEY: KeyCode = KeyCode::F(9);

pub fn start_thread(bus: SystemBus, mut manager: InputManager, settings_path: PathBuf) {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");

            // Blocking loop: wait for an event, handle it, repeat.
            while let Ok(raw_event) = bus.raw_input_rx.recv() {
                if is_reload(&raw_event) {
                    let settings = GameSettings::load(&settings_path);
                    manager.reload_keybinds(&settings.keybinds);
                    log::info!("INPUT: Keybinds reloaded from {}", settings_path.display());
                    continue;
                }

                if let Some(action) = manager.process(raw_event) {
                    log::debug!("INPUT: {:?} -> {:?}", raw_event.keycode, action);
                    if let Err(e) = bus.action_tx.send(action) {
                        log::error!("INPUT: Failed to send action (Logic thread died?): {}", e);
                        break;
                    }
                }
            }

            log::info!("INPUT: Thread stopped");
        })
        .expect("Failed to spawn Input thread");
}

fn is_reload(event: &RawInputEvent) -> bool {
    !event.ctrl && event.keycode == RELOAD_KEY
}
