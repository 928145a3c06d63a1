//! Core gameplay engine for the falling-note rhythm game.
//!
//! The `RhythmEngine` is the session controller for one run:
//! - Note spawning, scrolling and expiry (`notes`)
//! - Hit-window judgement of lane inputs (`input`)
//! - Score and combo tracking
//! - Render snapshots (`snapshot`)

mod input;
mod notes;
mod snapshot;

use notes::{NoteStream, SpawnCadence};

use crate::input::events::{GameAction, GameKind};
use crate::logic::audio::AudioManager;
use crate::logic::clock::FrameTick;
use crate::models::engine::{HitWindow, Particle};
use crate::models::score::ScoreTracker;
use crate::models::settings::{GameSettings, RhythmSettings};
use crate::models::stats::Judgement;
use crate::state::traits::{HandleAction, Session, Transition, Update, apply_lifecycle};
use crate::state::{ResultData, SessionPhase};
use crate::system::bus::SystemBus;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Main gameplay engine handling note flow, judgement and scoring.
pub struct RhythmEngine {
    settings: RhythmSettings,
    lane_labels: Vec<String>,
    phase: SessionPhase,

    /// Live notes.
    stream: NoteStream,
    /// Spawn timing and difficulty ramp.
    cadence: SpawnCadence,
    /// Hit feedback sparks.
    particles: Vec<Particle>,
    tracker: ScoreTracker,
    hit_window: HitWindow,

    /// Most recent outcome (for flash display).
    last_judgement: Option<Judgement>,
    /// Results of the last finished run.
    last_result: Option<ResultData>,

    audio: AudioManager,
    rng: StdRng,
}

impl RhythmEngine {
    /// Creates an idle engine seeded from the OS.
    pub fn new(settings: &GameSettings, bus: &SystemBus) -> Self {
        Self::with_rng(settings, bus, StdRng::from_os_rng())
    }

    /// Creates an idle engine with reproducible spawns.
    pub fn with_seed(settings: &GameSettings, bus: &SystemBus, seed: u64) -> Self {
        Self::with_rng(settings, bus, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: &GameSettings, bus: &SystemBus, rng: StdRng) -> Self {
        let rhythm = settings.rhythm.clone();
        Self {
            stream: NoteStream::new(&rhythm),
            cadence: SpawnCadence::new(&rhythm),
            particles: Vec::new(),
            tracker: ScoreTracker::new(),
            hit_window: HitWindow::new(rhythm.hit_line, rhythm.hit_window),
            lane_labels: (0..rhythm.lane_count)
                .map(|lane| settings.lane_label(lane))
                .collect(),
            settings: rhythm,
            phase: SessionPhase::Idle,
            last_judgement: None,
            last_result: None,
            audio: AudioManager::new(bus),
            rng,
        }
    }

    /// Advances the run by one frame:
    /// 1. Removes notes retired since the previous frame
    /// 2. Scrolls notes and reports expiries as misses
    /// 3. Spawns on cadence
    /// 4. Ages particles
    /// 5. Ends the run when the miss limit is reached
    ///
    /// Returns the results if this tick ended the run.
    pub fn tick(&mut self, tick: &FrameTick) -> Option<ResultData> {
        if self.phase != SessionPhase::Playing {
            return None;
        }

        self.stream.cleanup();

        let missed = self.stream.advance(tick.delta);
        for _ in 0..missed {
            self.tracker.apply(Judgement::Miss);
            self.last_judgement = Some(Judgement::Miss);
        }

        if self.cadence.on_frame() {
            let lane = self.stream.spawn(&mut self.rng);
            log::trace!("ENGINE: Spawned note in lane {}", lane);
        }

        self.particles.retain_mut(Particle::update);

        let max_misses = self.settings.max_misses;
        if max_misses > 0 && self.tracker.stats().misses >= max_misses {
            log::info!("ENGINE: Miss limit ({}) reached", max_misses);
            return self.stop();
        }
        None
    }

    fn result(&self) -> ResultData {
        ResultData {
            game: GameKind::Rhythm,
            score: self.tracker.score(),
            max_combo: self.tracker.max_combo(),
            level: self.cadence.level(),
            hit_stats: self.tracker.stats(),
        }
    }

    pub fn score(&self) -> u64 {
        self.tracker.score()
    }

    pub fn combo(&self) -> u32 {
        self.tracker.combo()
    }

    pub fn level(&self) -> u32 {
        self.cadence.level()
    }

    pub fn stream(&self) -> &NoteStream {
        &self.stream
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn last_result(&self) -> Option<&ResultData> {
        self.last_result.as_ref()
    }

    /// Places a note directly, bypassing the cadence. Used by tests.
    #[cfg(test)]
    pub(crate) fn stream_mut(&mut self) -> &mut NoteStream {
        &mut self.stream
    }
}

impl Session for RhythmEngine {
    fn start(&mut self) {
        self.stream.clear();
        self.cadence.reset();
        self.particles.clear();
        self.tracker.reset();
        self.last_judgement = None;
        self.phase = SessionPhase::Playing;
        log::info!(
            "ENGINE: Run started ({} lanes, spawn every {} frames)",
            self.settings.lane_count,
            self.cadence.interval()
        );
    }

    fn stop(&mut self) -> Option<ResultData> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        self.phase = SessionPhase::Ended;
        let result = self.result();
        log::info!(
            "ENGINE: Run ended - score {}, max combo {}, accuracy {:.1}%",
            result.score,
            result.max_combo,
            result.accuracy()
        );
        self.last_result = Some(result.clone());
        Some(result)
    }

    fn phase(&self) -> SessionPhase {
        self.phase
    }
}

impl Update for RhythmEngine {
    fn update(&mut self, tick: &FrameTick) -> Transition {
        self.tick(tick)
            .map_or(Transition::None, Transition::ToResult)
    }
}

impl HandleAction for RhythmEngine {
    fn handle_action(&mut self, action: &GameAction) -> Transition {
        if let Some(transition) = apply_lifecycle(self, action) {
            return transition;
        }
        if let GameAction::Hit { lane } = action {
            self.judge(*lane);
        }
        Transition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::bus::AudioCommand;

    fn engine() -> (RhythmEngine, SystemBus) {
        let bus = SystemBus::new();
        let engine = RhythmEngine::with_seed(&GameSettings::default(), &bus, 1);
        (engine, bus)
    }

    fn frame() -> FrameTick {
        FrameTick::frames(60)
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let (mut engine, _bus) = engine();
        for _ in 0..200 {
            assert_eq!(engine.update(&frame()), Transition::None);
        }
        assert!(engine.stream().notes().is_empty());
        assert_eq!(engine.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_spawns_on_cadence() {
        let (mut engine, _bus) = engine();
        engine.start();
        for _ in 0..59 {
            engine.tick(&frame());
        }
        assert!(engine.stream().notes().is_empty());
        engine.tick(&frame());
        assert_eq!(engine.stream().notes().len(), 1);
        assert_eq!(engine.stream().notes()[0].position(), 0.0);
    }

    #[test]
    fn test_expired_note_misses_once_then_is_removed() {
        let (mut engine, _bus) = engine();
        engine.start();
        engine.handle_action(&GameAction::Hit { lane: 0 });
        for _ in 0..5 {
            engine.tracker.on_hit(0);
        }
        engine.stream_mut().spawn_in(2);

        // 151 frames push the note past 600.
        for _ in 0..151 {
            engine.tick(&frame());
        }
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.tracker.stats().misses, 1);
        assert_eq!(engine.last_judgement, Some(Judgement::Miss));
        assert!(engine.stream().notes().iter().any(|n| n.id() == 0));

        engine.tick(&frame());
        assert!(engine.stream().notes().iter().all(|n| n.id() != 0));
        assert_eq!(engine.tracker.stats().misses, 1);
    }

    #[test]
    fn test_stop_is_idempotent_and_freezes_state() {
        let (mut engine, _bus) = engine();
        engine.start();
        for _ in 0..120 {
            engine.tick(&frame());
        }
        let result = engine.stop().unwrap();
        assert_eq!(result.game, GameKind::Rhythm);
        assert_eq!(engine.stop(), None);
        assert_eq!(engine.handle_action(&GameAction::Stop), Transition::None);

        let notes = engine.stream().notes().to_vec();
        for _ in 0..100 {
            engine.tick(&frame());
        }
        assert_eq!(engine.stream().notes(), notes.as_slice());
        assert_eq!(engine.last_result(), Some(&result));
    }

    #[test]
    fn test_restart_twice_equals_once() {
        let (mut engine, _bus) = engine();
        engine.start();
        engine.stream_mut().spawn_in(1);
        for _ in 0..120 {
            engine.tick(&frame());
        }
        engine.judge(1);
        assert!(engine.score() > 0);
        assert!(!engine.particles().is_empty());

        engine.restart();
        engine.restart();
        assert_eq!(engine.phase(), SessionPhase::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.level(), 1);
        assert!(engine.stream().notes().is_empty());
        assert!(engine.particles().is_empty());
        assert_eq!(engine.cadence.frame_count(), 0);
    }

    #[test]
    fn test_miss_limit_ends_run() {
        let bus = SystemBus::new();
        let mut settings = GameSettings::default();
        settings.rhythm.max_misses = 2;
        let mut engine = RhythmEngine::with_seed(&settings, &bus, 3);
        engine.start();
        engine.stream_mut().spawn_in(0);
        engine.stream_mut().spawn_in(1);

        let mut ended = None;
        for _ in 0..151 {
            if let Transition::ToResult(result) = engine.update(&frame()) {
                ended = Some(result);
            }
        }
        let result = ended.expect("run should end on the second miss");
        assert_eq!(result.hit_stats.misses, 2);
        assert_eq!(engine.phase(), SessionPhase::Ended);
    }

    #[test]
    fn test_start_action_ignored_while_playing() {
        let (mut engine, _bus) = engine();
        engine.handle_action(&GameAction::Start);
        engine.stream_mut().spawn_in(0);
        engine.handle_action(&GameAction::Start);
        assert_eq!(engine.stream().notes().len(), 1);

        engine.handle_action(&GameAction::Restart);
        assert!(engine.stream().notes().is_empty());
    }

    #[test]
    fn test_hit_plays_lane_tone() {
        let (mut engine, bus) = engine();
        engine.start();
        engine.stream_mut().spawn_in(3);
        for _ in 0..125 {
            engine.tick(&frame());
        }
        engine.handle_action(&GameAction::Hit { lane: 3 });
        assert_eq!(
            bus.audio_cmd_rx.try_recv(),
            Ok(AudioCommand::PlayTone { index: 3 })
        );
    }
}
