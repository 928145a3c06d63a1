use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press captured by the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub keycode: KeyCode,
    pub ctrl: bool,
}

impl RawInputEvent {
    /// Only presses are forwarded; repeats and releases are dropped.
    pub fn from_crossterm(event: &Event) -> Option<Self> {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            Some(Self {
                keycode: normalize(*code),
                ctrl: modifiers.contains(KeyModifiers::CONTROL),
            })
        } else {
            None
        }
    }
}

/// Letter keys are bound case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Which minigame is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Rhythm,
    Echo,
}

impl GameKind {
    pub fn other(self) -> Self {
        match self {
            GameKind::Rhythm => GameKind::Echo,
            GameKind::Echo => GameKind::Rhythm,
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameKind::Rhythm => write!(f, "RHYTHM"),
            GameKind::Echo => write!(f, "ECHO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    // Gameplay
    Hit { lane: usize },
    Start,
    Restart,
    Stop,

    // System
    SwitchGame,
}
