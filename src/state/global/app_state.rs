//! The game currently loaded into the state machine.

use crate::input::events::GameKind;
use crate::state::{EchoGame, RhythmEngine};

/// One of the two minigames, driven by `GlobalState`.
pub(super) enum ActiveGame {
    /// Falling-note gameplay.
    Rhythm(RhythmEngine),
    /// Sequence-repeat memory game.
    Echo(EchoGame),
}

impl ActiveGame {
    pub(super) fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Rhythm(_) => GameKind::Rhythm,
            ActiveGame::Echo(_) => GameKind::Echo,
        }
    }
}
