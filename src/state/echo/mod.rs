//! Sequence-repeat ("echo") memory game.
//!
//! Each round appends one random pad to the sequence, plays the whole
//! sequence back with input blocked, then lets the player repeat it. The first
//! wrong pad ends the run; a complete repeat advances the round.
//!
//! All pacing goes through the game-time [`Scheduler`]. Starting or ending a
//! session cancels everything pending, so a round timer from an earlier run
//! can never touch a new one.

use crate::input::events::{GameAction, GameKind};
use crate::logic::audio::AudioManager;
use crate::logic::clock::FrameTick;
use crate::models::score::ScoreTracker;
use crate::models::settings::{EchoSettings, GameSettings};
use crate::models::stats::Judgement;
use crate::shared::snapshot::EchoSnapshot;
use crate::state::traits::{HandleAction, Session, Snapshot, Transition, Update, apply_lifecycle};
use crate::state::{ResultData, SessionPhase};
use crate::system::bus::SystemBus;
use crate::system::scheduler::Scheduler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Status line shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoStatus {
    /// Waiting for the first start.
    #[default]
    Ready,
    /// Session started, first round not shown yet.
    Watch,
    /// Sequence playback in progress.
    Listen,
    YourTurn,
    /// Round cleared, next one pending.
    GoodJob,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EchoEvent {
    NextRound,
    ShowStep { index: usize },
    PadOff { flash: u64 },
    Unblock,
}

pub struct EchoGame {
    settings: EchoSettings,
    lane_count: usize,
    lane_labels: Vec<String>,
    phase: SessionPhase,

    sequence: Vec<usize>,
    player_input: Vec<usize>,
    level: u32,
    input_blocked: bool,
    status: EchoStatus,

    lit_pad: Option<usize>,
    /// Bumped on every flash so only the latest flash's PadOff unlights.
    flash_serial: u64,

    scheduler: Scheduler<EchoEvent>,
    tracker: ScoreTracker,
    last_result: Option<ResultData>,
    audio: AudioManager,
    rng: StdRng,
}

impl EchoGame {
    pub fn new(settings: &GameSettings, bus: &SystemBus) -> Self {
        Self::with_rng(settings, bus, StdRng::from_os_rng())
    }

    pub fn with_seed(settings: &GameSettings, bus: &SystemBus, seed: u64) -> Self {
        Self::with_rng(settings, bus, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: &GameSettings, bus: &SystemBus, rng: StdRng) -> Self {
        let lane_count = settings.rhythm.lane_count;
        Self {
            settings: settings.echo.clone(),
            lane_count,
            lane_labels: (0..lane_count).map(|l| settings.lane_label(l)).collect(),
            phase: SessionPhase::Idle,
            sequence: Vec::new(),
            player_input: Vec::new(),
            level: 1,
            input_blocked: true,
            status: EchoStatus::Ready,
            lit_pad: None,
            flash_serial: 0,
            scheduler: Scheduler::new(),
            tracker: ScoreTracker::new(),
            last_result: None,
            audio: AudioManager::new(bus),
            rng,
        }
    }

    /// Advances game time and runs every event that became due.
    /// Returns nothing and touches nothing unless the session is running.
    pub fn tick(&mut self, tick: &FrameTick) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.scheduler.advance(tick.elapsed_ms);
        while let Some(event) = self.scheduler.pop_due() {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: EchoEvent) {
        match event {
            EchoEvent::NextRound => self.next_round(),
            EchoEvent::ShowStep { index } => {
                if let Some(&pad) = self.sequence.get(index) {
                    self.flash(pad);
                }
            }
            EchoEvent::PadOff { flash } => {
                if flash == self.flash_serial {
                    self.lit_pad = None;
                }
            }
            EchoEvent::Unblock => {
                self.input_blocked = false;
                self.status = EchoStatus::YourTurn;
            }
        }
    }

    fn next_round(&mut self) {
        self.player_input.clear();
        self.input_blocked = true;

        let pad = self.rng.random_range(0..self.lane_count);
        self.sequence.push(pad);
        self.status = EchoStatus::Listen;
        log::debug!(
            "ECHO: Round {} ({} steps)",
            self.level,
            self.sequence.len()
        );

        // Step i lights after (i + 1) intervals; input opens once the last
        // pad has gone dark.
        let step_ms = self.settings.pad_delay_ms + self.settings.gap_delay_ms;
        for index in 0..self.sequence.len() {
            self.scheduler
                .schedule_after(step_ms * (index + 1) as f64, EchoEvent::ShowStep { index });
        }
        self.scheduler.schedule_after(
            step_ms * self.sequence.len() as f64 + self.settings.pad_delay_ms,
            EchoEvent::Unblock,
        );
    }

    /// Lights a pad and plays its tone.
    fn flash(&mut self, pad: usize) {
        self.flash_serial += 1;
        self.lit_pad = Some(pad);
        self.audio.play_tone(pad);
        self.scheduler.schedule_after(
            self.settings.pad_delay_ms,
            EchoEvent::PadOff {
                flash: self.flash_serial,
            },
        );
    }

    /// Checks one player press against the recorded sequence.
    ///
    /// Ignored while blocked, while not playing, or for an invalid pad.
    pub(crate) fn press(&mut self, pad: usize) -> Option<Judgement> {
        if self.input_blocked || self.phase != SessionPhase::Playing || pad >= self.lane_count {
            return None;
        }

        let step = self.player_input.len();
        if self.sequence.get(step) != Some(&pad) {
            self.tracker.on_miss();
            log::info!(
                "ECHO: Wrong pad {} at step {} of round {}",
                pad,
                step + 1,
                self.level
            );
            return Some(Judgement::Miss);
        }

        self.flash(pad);
        self.player_input.push(pad);
        self.tracker.on_hit(pad);

        if self.player_input.len() == self.sequence.len() {
            self.input_blocked = true;
            self.level += 1;
            self.status = EchoStatus::GoodJob;
            self.scheduler
                .schedule_after(self.settings.round_clear_delay_ms, EchoEvent::NextRound);
        }
        Some(Judgement::Hit { lane: pad })
    }

    fn result(&self) -> ResultData {
        ResultData {
            game: GameKind::Echo,
            score: self.tracker.score(),
            max_combo: self.tracker.max_combo(),
            level: self.level,
            hit_stats: self.tracker.stats(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> EchoStatus {
        self.status
    }

    pub fn is_input_blocked(&self) -> bool {
        self.input_blocked
    }

    pub fn last_result(&self) -> Option<&ResultData> {
        self.last_result.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn sequence(&self) -> &[usize] {
        &self.sequence
    }
}

impl Session for EchoGame {
    fn start(&mut self) {
        self.scheduler.cancel_all();
        self.sequence.clear();
        self.player_input.clear();
        self.level = 1;
        self.input_blocked = true;
        self.lit_pad = None;
        self.tracker.reset();
        self.status = EchoStatus::Watch;
        self.phase = SessionPhase::Playing;
        self.scheduler
            .schedule_after(self.settings.start_delay_ms, EchoEvent::NextRound);
        log::info!(
            "ECHO: Session started (generation {})",
            self.scheduler.generation()
        );
    }

    fn stop(&mut self) -> Option<ResultData> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        self.scheduler.cancel_all();
        self.phase = SessionPhase::Ended;
        self.input_blocked = true;
        self.lit_pad = None;
        self.status = EchoStatus::GameOver;

        let result = self.result();
        log::info!("ECHO: Game over - reached level {}", result.level);
        self.last_result = Some(result.clone());
        Some(result)
    }

    fn phase(&self) -> SessionPhase {
        self.phase
    }
}

impl Update for EchoGame {
    fn update(&mut self, tick: &FrameTick) -> Transition {
        self.tick(tick);
        Transition::None
    }
}

impl HandleAction for EchoGame {
    fn handle_action(&mut self, action: &GameAction) -> Transition {
        if let Some(transition) = apply_lifecycle(self, action) {
            return transition;
        }
        if let GameAction::Hit { lane } = action
            && self.press(*lane) == Some(Judgement::Miss)
        {
            return self
                .stop()
                .map_or(Transition::None, Transition::ToResult);
        }
        Transition::None
    }
}

impl Snapshot for EchoGame {
    type Output = EchoSnapshot;

    fn create_snapshot(&self) -> EchoSnapshot {
        EchoSnapshot {
            phase: self.phase,
            lane_labels: self.lane_labels.clone(),
            status: self.status,
            lit_pad: self.lit_pad,
            level: self.level,
            progress: self.player_input.len(),
            sequence_len: self.sequence.len(),
            input_blocked: self.input_blocked,
            score: self.tracker.score(),
            combo: self.tracker.combo(),
            result: match self.phase {
                SessionPhase::Ended => self.last_result.clone(),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::bus::AudioCommand;

    // 10 ms frames keep every default delay on a frame boundary.
    fn frame() -> FrameTick {
        FrameTick::frames(100)
    }

    fn game() -> (EchoGame, SystemBus) {
        let bus = SystemBus::new();
        let game = EchoGame::with_seed(&GameSettings::default(), &bus, 11);
        (game, bus)
    }

    fn run_ms(game: &mut EchoGame, ms: u32) {
        for _ in 0..ms / 10 {
            game.tick(&frame());
        }
    }

    /// Runs until the player may press, returning the sequence to repeat.
    fn wait_for_turn(game: &mut EchoGame) -> Vec<usize> {
        for _ in 0..10_000 {
            if !game.is_input_blocked() {
                return game.sequence().to_vec();
            }
            game.tick(&frame());
        }
        panic!("input never unblocked");
    }

    #[test]
    fn test_first_round_waits_for_start_delay() {
        let (mut game, _bus) = game();
        game.start();
        run_ms(&mut game, 990);
        assert!(game.sequence().is_empty());
        assert_eq!(game.status(), EchoStatus::Watch);
        run_ms(&mut game, 10);
        assert_eq!(game.sequence().len(), 1);
        assert_eq!(game.status(), EchoStatus::Listen);
    }

    #[test]
    fn test_playback_blocks_input_then_opens() {
        let (mut game, bus) = game();
        game.start();
        run_ms(&mut game, 1000);
        let pad = game.sequence()[0];

        // Lit after one 650 ms interval, input opens 400 ms later.
        run_ms(&mut game, 650);
        assert_eq!(game.create_snapshot().lit_pad, Some(pad));
        assert_eq!(
            bus.audio_cmd_rx.try_recv(),
            Ok(AudioCommand::PlayTone { index: pad })
        );
        assert_eq!(game.press(pad), None);

        run_ms(&mut game, 400);
        assert!(!game.is_input_blocked());
        assert_eq!(game.status(), EchoStatus::YourTurn);
        assert_eq!(game.create_snapshot().lit_pad, None);
    }

    #[test]
    fn test_correct_repeat_advances_round() {
        let (mut game, _bus) = game();
        game.start();
        for round in 1..=4u32 {
            let sequence = wait_for_turn(&mut game);
            assert_eq!(sequence.len(), round as usize);
            assert_eq!(game.level(), round);
            for pad in sequence {
                assert_eq!(game.press(pad), Some(Judgement::Hit { lane: pad }));
            }
            assert_eq!(game.status(), EchoStatus::GoodJob);
            assert!(game.is_input_blocked());
        }
        assert_eq!(game.level(), 5);
        // 1 + 2 + 3 + 4 consecutive correct steps.
        assert_eq!(game.create_snapshot().combo, 10);
    }

    #[test]
    fn test_wrong_pad_ends_immediately() {
        let (mut game, _bus) = game();
        game.start();
        let sequence = wait_for_turn(&mut game);
        let wrong = (sequence[0] + 1) % 4;

        let transition = game.handle_action(&GameAction::Hit { lane: wrong });
        let Transition::ToResult(result) = transition else {
            panic!("expected the run to end");
        };
        assert_eq!(result.game, GameKind::Echo);
        assert_eq!(result.level, 1);
        assert_eq!(result.hit_stats.misses, 1);
        assert_eq!(game.phase(), SessionPhase::Ended);
        assert_eq!(game.status(), EchoStatus::GameOver);
        assert_eq!(game.scheduler.pending(), 0);

        // Nothing moves after the end.
        run_ms(&mut game, 5000);
        assert_eq!(game.sequence().len(), 1);
        assert_eq!(game.press(sequence[0]), None);
    }

    #[test]
    fn test_restart_drops_stale_round_timer() {
        let (mut game, _bus) = game();
        game.start();
        let sequence = wait_for_turn(&mut game);
        for pad in sequence {
            game.press(pad);
        }
        // A NextRound is pending from the cleared round; restart now.
        game.restart();
        game.restart();

        run_ms(&mut game, 990);
        assert!(game.sequence().is_empty());
        run_ms(&mut game, 10);
        assert_eq!(game.sequence().len(), 1);
        assert_eq!(game.level(), 1);

        // Only one round was started: no extra step shows up later.
        run_ms(&mut game, 3000);
        assert_eq!(game.sequence().len(), 1);
    }

    #[test]
    fn test_invalid_pad_and_idle_input_ignored() {
        let (mut game, _bus) = game();
        assert_eq!(game.press(0), None);
        game.start();
        wait_for_turn(&mut game);
        assert_eq!(game.press(4), None);
        assert_eq!(game.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut game, _bus) = game();
        assert_eq!(game.stop(), None);
        game.start();
        assert!(game.stop().is_some());
        assert_eq!(game.stop(), None);
        assert!(game.last_result().is_some());
    }
}
