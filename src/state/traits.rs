//! Traits for state management.
//!
//! Both minigames implement the same lifecycle, update and action traits so
//! the global state can drive whichever one is loaded.

use crate::input::events::GameAction;
use crate::logic::clock::FrameTick;

use super::{ResultData, SessionPhase};

/// Transition result from handling an action or update.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Stay in current state.
    None,
    /// The session just ended with these results.
    ToResult(ResultData),
}

/// Session lifecycle: `Idle -> Playing -> Ended -> Playing`.
pub trait Session {
    /// Resets everything to defaults and enters `Playing`.
    fn start(&mut self);

    /// Ends a running session. Only the call that leaves `Playing` returns
    /// results; any later call is a no-op.
    fn stop(&mut self) -> Option<ResultData>;

    /// Same effect as [`Session::start`] from any phase.
    fn restart(&mut self) {
        self.start();
    }

    fn phase(&self) -> SessionPhase;

    fn is_playing(&self) -> bool {
        self.phase() == SessionPhase::Playing
    }
}

/// Trait for creating render-ready snapshots.
///
/// Snapshots are immutable captures of state sent to the render thread.
pub trait Snapshot {
    /// The snapshot type produced.
    type Output;

    /// Creates an immutable snapshot for rendering.
    fn create_snapshot(&self) -> Self::Output;
}

/// Trait for per-frame updates.
pub trait Update {
    /// Updates the state for one frame. A tick delivered outside `Playing`
    /// must not mutate anything.
    fn update(&mut self, tick: &FrameTick) -> Transition;
}

/// Trait for handling game actions.
pub trait HandleAction {
    /// Handles a game action and returns any state transition.
    fn handle_action(&mut self, action: &GameAction) -> Transition;
}

/// Shared mapping of session-control actions onto the lifecycle.
///
/// Returns `None` for actions that are not lifecycle actions.
pub(crate) fn apply_lifecycle<S: Session>(session: &mut S, action: &GameAction) -> Option<Transition> {
    match action {
        GameAction::Start => {
            if !session.is_playing() {
                session.start();
            }
            Some(Transition::None)
        }
        GameAction::Restart => {
            session.restart();
            Some(Transition::None)
        }
        GameAction::Stop => Some(
            session
                .stop()
                .map_or(Transition::None, Transition::ToResult),
        ),
        _ => None,
    }
}
