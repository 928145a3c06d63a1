use super::events::{GameAction, RawInputEvent};
use super::keycode::parse_keycode;
use crossterm::event::KeyCode;
use std::collections::HashMap;

/// Translates raw key presses into game actions.
pub struct InputManager {
    bindings: HashMap<KeyCode, GameAction>,
    lane_count: usize,
}

impl InputManager {
    pub fn new(lane_count: usize, keybinds: &HashMap<String, Vec<String>>) -> Self {
        let mut manager = Self {
            bindings: HashMap::new(),
            lane_count,
        };
        manager.load_default_bindings();
        manager.reload_keybinds(keybinds);
        manager
    }

    pub fn process(&self, event: RawInputEvent) -> Option<GameAction> {
        // Ctrl chords belong to the render thread (quit).
        if event.ctrl {
            return None;
        }
        self.bindings.get(&event.keycode).cloned()
    }

    /// Replaces the lane keys with the entry for the current lane count.
    /// Unknown key names are skipped; an entry with no usable key is ignored.
    pub fn reload_keybinds(&mut self, keybinds: &HashMap<String, Vec<String>>) {
        let key = self.lane_count.to_string();
        let Some(entries) = keybinds.get(&key) else {
            log::warn!("INPUT: No keybinds for {} lanes, keeping defaults", key);
            return;
        };

        let mut parsed = Vec::new();
        for (idx, label) in entries.iter().enumerate() {
            if idx >= self.lane_count {
                break;
            }
            match parse_keycode(label) {
                Some(code) => parsed.push((idx, code)),
                None => log::warn!("INPUT: Unknown key name in keybinds: {}", label),
            }
        }

        if parsed.is_empty() {
            return;
        }

        self.bindings
            .retain(|_, action| !matches!(action, GameAction::Hit { .. }));

        for (lane, code) in parsed {
            self.bindings.insert(code, GameAction::Hit { lane });
        }
    }

    fn load_default_bindings(&mut self) {
        // Gameplay 4K
        for (lane, c) in ['d', 'f', 'j', 'k'].into_iter().enumerate() {
            if lane < self.lane_count {
                self.bindings
                    .insert(KeyCode::Char(c), GameAction::Hit { lane });
            }
        }

        // Session control
        self.bindings.insert(KeyCode::Enter, GameAction::Start);
        self.bindings.insert(KeyCode::F(5), GameAction::Restart);
        self.bindings.insert(KeyCode::Esc, GameAction::Stop);
        self.bindings.insert(KeyCode::Tab, GameAction::SwitchGame);
    }
}
