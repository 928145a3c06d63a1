//! Key names used in the settings file.
//!
//! Names follow the physical-key style (`KeyD`, `Digit1`, `Space`) so a
//! keybinds table reads the same whatever the terminal reports.

use crossterm::event::KeyCode;

pub fn parse_keycode(s: &str) -> Option<KeyCode> {
    if let Some(letter) = s.strip_prefix("Key") {
        return single_char(letter)
            .filter(char::is_ascii_alphabetic)
            .map(|c| KeyCode::Char(c.to_ascii_lowercase()));
    }
    if let Some(digit) = s.strip_prefix("Digit") {
        return single_char(digit)
            .filter(char::is_ascii_digit)
            .map(KeyCode::Char);
    }
    match s {
        "Space" => Some(KeyCode::Char(' ')),
        "Enter" => Some(KeyCode::Enter),
        "Escape" => Some(KeyCode::Esc),
        "Backspace" => Some(KeyCode::Backspace),
        "Tab" => Some(KeyCode::Tab),
        "ArrowUp" => Some(KeyCode::Up),
        "ArrowDown" => Some(KeyCode::Down),
        "ArrowLeft" => Some(KeyCode::Left),
        "ArrowRight" => Some(KeyCode::Right),
        "Semicolon" => Some(KeyCode::Char(';')),
        "Quote" => Some(KeyCode::Char('\'')),
        "Comma" => Some(KeyCode::Char(',')),
        "Period" => Some(KeyCode::Char('.')),
        "Slash" => Some(KeyCode::Char('/')),
        "Backslash" => Some(KeyCode::Char('\\')),
        "BracketLeft" => Some(KeyCode::Char('[')),
        "BracketRight" => Some(KeyCode::Char(']')),
        "Minus" => Some(KeyCode::Char('-')),
        "Equal" => Some(KeyCode::Char('=')),
        _ => s
            .strip_prefix('F')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
