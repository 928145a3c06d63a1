//! Global state management for the game state machine.

mod app_state;

use app_state::ActiveGame;

use crate::input::events::{GameAction, GameKind};
use crate::logic::audio::AudioManager;
use crate::logic::clock::FrameTick;
use crate::models::settings::GameSettings;
use crate::shared::snapshot::RenderState;
use crate::state::{HandleAction, Session, Snapshot, Transition, Update};
use crate::state::{EchoGame, ResultData, RhythmEngine};
use crate::system::bus::SystemBus;

/// Owns whichever game is loaded and routes actions and frames to it.
pub struct GlobalState {
    current: ActiveGame,
    settings: GameSettings,
    bus: SystemBus,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    seed: Option<u64>,
    last_result: Option<ResultData>,
    audio: AudioManager,
}

impl GlobalState {
    pub fn new(settings: GameSettings, bus: SystemBus, kind: GameKind, seed: Option<u64>) -> Self {
        log::info!("LOGIC: Initializing Global State ({})", kind);
        let current = build_game(kind, &settings, &bus, seed);
        let audio = AudioManager::new(&bus);
        audio.set_volume(settings.general.master_volume);
        Self {
            current,
            audio,
            settings,
            bus,
            seed,
            last_result: None,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.current.kind()
    }

    /// Results of the most recently finished session of either game.
    pub fn last_result(&self) -> Option<&ResultData> {
        self.last_result.as_ref()
    }

    /// Stops the running session, if any, and silences the audio thread.
    pub fn shutdown(&mut self) {
        if let Some(result) = self.stop_current() {
            self.record(result);
        }
        self.audio.shutdown();
    }

    /// Ticks the active game and records a run that ended this frame.
    pub fn update(&mut self, tick: &FrameTick) {
        let transition = match &mut self.current {
            ActiveGame::Rhythm(engine) => engine.update(tick),
            ActiveGame::Echo(echo) => echo.update(tick),
        };
        self.apply(transition);
    }

    /// Routes a `GameAction` to the current game and applies the resulting transition.
    pub fn handle_action(&mut self, action: GameAction) {
        if let GameAction::SwitchGame = action {
            self.switch_game();
            return;
        }

        let transition = match &mut self.current {
            ActiveGame::Rhythm(engine) => engine.handle_action(&action),
            ActiveGame::Echo(echo) => echo.handle_action(&action),
        };
        self.apply(transition);
    }

    /// Produces a render-ready snapshot for the render thread.
    pub fn create_snapshot(&self) -> RenderState {
        match &self.current {
            ActiveGame::Rhythm(engine) => RenderState::Rhythm(engine.create_snapshot()),
            ActiveGame::Echo(echo) => RenderState::Echo(echo.create_snapshot()),
        }
    }

    fn switch_game(&mut self) {
        if let Some(result) = self.stop_current() {
            self.record(result);
        }
        let next = self.kind().other();
        log::info!("LOGIC: Switching to {}", next);
        self.current = build_game(next, &self.settings, &self.bus, self.seed);
    }

    fn stop_current(&mut self) -> Option<ResultData> {
        match &mut self.current {
            ActiveGame::Rhythm(engine) => engine.stop(),
            ActiveGame::Echo(echo) => echo.stop(),
        }
    }

    fn apply(&mut self, transition: Transition) {
        if let Transition::ToResult(result) = transition {
            self.record(result);
        }
    }

    fn record(&mut self, result: ResultData) {
        log::info!(
            "LOGIC: {} finished - score {}, level {}, accuracy {:.1}%",
            result.game,
            result.score,
            result.level,
            result.accuracy()
        );
        self.last_result = Some(result);
    }
}

fn build_game(
    kind: GameKind,
    settings: &GameSettings,
    bus: &SystemBus,
    seed: Option<u64>,
) -> ActiveGame {
    match (kind, seed) {
        (GameKind::Rhythm, Some(seed)) => {
            ActiveGame::Rhythm(RhythmEngine::with_seed(settings, bus, seed))
        }
        (GameKind::Rhythm, None) => ActiveGame::Rhythm(RhythmEngine::new(settings, bus)),
        (GameKind::Echo, Some(seed)) => ActiveGame::Echo(EchoGame::with_seed(settings, bus, seed)),
        (GameKind::Echo, None) => ActiveGame::Echo(EchoGame::new(settings, bus)),
    }
}
