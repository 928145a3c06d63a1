//! Judgement of lane inputs against the note stream.

use super::RhythmEngine;
use crate::models::engine::Particle;
use crate::models::stats::Judgement;
use crate::state::SessionPhase;

impl RhythmEngine {
    /// Judges a press on `lane` against the judgement line.
    ///
    /// Picks the active note in that lane closest to the line inside the hit
    /// window (earliest spawned on a tie), retires it and scores the hit.
    /// Presses on an empty lane, out-of-range lanes and presses outside a
    /// running session change nothing and return `None`.
    pub(crate) fn judge(&mut self, lane: usize) -> Option<Judgement> {
        if !self.is_running() || lane >= self.stream.lane_count() {
            return None;
        }

        let id = self.find_best_note(lane)?;
        if !self.stream.retire(id) {
            return None;
        }

        let judgement = Judgement::Hit { lane };
        let awarded = self.tracker.on_hit(lane);
        log::debug!(
            "ENGINE: Hit lane {} (+{}, combo {})",
            lane,
            awarded,
            self.tracker.combo()
        );

        self.audio.play_tone(lane);
        self.particles.extend(Particle::burst(
            &mut self.rng,
            lane,
            self.hit_window.hit_line,
            self.settings.particles_per_hit,
            self.settings.particle_life,
        ));
        self.last_judgement = Some(judgement);
        Some(judgement)
    }

    /// Id of the best eligible note in `lane`, if any.
    fn find_best_note(&self, lane: usize) -> Option<u64> {
        let mut best: Option<(f64, u64)> = None;
        for note in self.stream.active().filter(|n| n.lane() == lane) {
            let Some(distance) = self.hit_window.judge(note.position()) else {
                continue;
            };
            // Strict comparison keeps the earliest note on equal distance.
            if best.is_none_or(|(min, _)| distance < min) {
                best = Some((distance, note.id()));
            }
        }
        best.map(|(_, id)| id)
    }

    fn is_running(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::clock::FrameTick;
    use crate::models::settings::GameSettings;
    use crate::state::traits::Session;
    use crate::system::bus::SystemBus;

    fn playing() -> RhythmEngine {
        let bus = SystemBus::new();
        let mut settings = GameSettings::default();
        // Keep the cadence out of the way.
        settings.rhythm.spawn_interval = 10_000;
        settings.rhythm.min_spawn_interval = 10_000;
        let mut engine = RhythmEngine::with_seed(&settings, &bus, 9);
        engine.start();
        engine
    }

    fn run_frames(engine: &mut RhythmEngine, frames: u32) {
        let tick = FrameTick::frames(60);
        for _ in 0..frames {
            engine.tick(&tick);
        }
    }

    #[test]
    fn test_empty_lane_is_noop() {
        let mut engine = playing();
        assert_eq!(engine.judge(2), None);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.combo(), 0);
    }

    #[test]
    fn test_hit_inside_window_then_retired() {
        let mut engine = playing();
        engine.stream.spawn_in(1);
        // 120 frames * 4.0 = 480, 20 short of the line at 500.
        run_frames(&mut engine, 120);
        assert_eq!(engine.stream.notes()[0].position(), 480.0);

        assert_eq!(engine.judge(1), Some(Judgement::Hit { lane: 1 }));
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.combo(), 1);

        assert_eq!(engine.judge(1), None);
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.combo(), 1);
    }

    #[test]
    fn test_wrong_lane_and_out_of_range_are_noops() {
        let mut engine = playing();
        engine.stream.spawn_in(1);
        run_frames(&mut engine, 125);

        assert_eq!(engine.judge(0), None);
        assert_eq!(engine.judge(4), None);
        assert_eq!(engine.judge(usize::MAX), None);
        assert_eq!(engine.stream.active().count(), 1);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_outside_window_is_noop() {
        let mut engine = playing();
        engine.stream.spawn_in(0);
        // 112 * 4 = 448, just outside the 50 window.
        run_frames(&mut engine, 112);
        assert_eq!(engine.judge(0), None);
        assert!(engine.stream.notes()[0].is_active());

        run_frames(&mut engine, 1);
        assert!(engine.judge(0).is_some());
    }

    #[test]
    fn test_three_consecutive_hits() {
        let mut engine = playing();
        let mut awards = Vec::new();
        for lane in 0..3 {
            engine.stream.spawn_in(lane);
        }
        run_frames(&mut engine, 125);
        for lane in 0..3 {
            let before = engine.score();
            engine.judge(lane);
            awards.push(engine.score() - before);
        }
        assert_eq!(awards, vec![100, 110, 120]);
        assert_eq!(engine.score(), 330);
        assert_eq!(engine.combo(), 3);
    }

    #[test]
    fn test_closest_note_wins() {
        let mut engine = playing();
        let ahead = engine.stream.spawn_in(2);
        run_frames(&mut engine, 10);
        let behind = engine.stream.spawn_in(2);
        // ahead = 125 * 4 = 500 (on the line), behind = 115 * 4 = 460 (40 short).
        run_frames(&mut engine, 115);

        assert_eq!(engine.judge(2), Some(Judgement::Hit { lane: 2 }));
        let active: Vec<u64> = engine.stream.active().map(|n| n.id()).collect();
        assert_eq!(active, vec![behind]);
        assert_ne!(ahead, behind);

        // The remaining note is still inside the window.
        assert_eq!(engine.judge(2), Some(Judgement::Hit { lane: 2 }));
        assert_eq!(engine.stream.active().count(), 0);
    }

    #[test]
    fn test_equal_distance_prefers_earliest() {
        let mut engine = playing();
        let first = engine.stream.spawn_in(3);
        run_frames(&mut engine, 10);
        let second = engine.stream.spawn_in(3);
        // first = 130 * 4 = 520, second = 120 * 4 = 480: both 20 from the line.
        run_frames(&mut engine, 120);

        engine.judge(3);
        let active: Vec<u64> = engine.stream.active().map(|n| n.id()).collect();
        assert_eq!(active, vec![second]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_double_press_same_frame_scores_once() {
        let mut engine = playing();
        engine.stream.spawn_in(0);
        run_frames(&mut engine, 125);

        let first = engine.judge(0);
        let second = engine.judge(0);
        assert_eq!(first, Some(Judgement::Hit { lane: 0 }));
        assert_eq!(second, None);
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.particles().len(), 8);
    }

    #[test]
    fn test_input_after_stop_is_ignored() {
        let mut engine = playing();
        engine.stream.spawn_in(0);
        run_frames(&mut engine, 125);
        engine.stop();
        assert_eq!(engine.judge(0), None);
        assert_eq!(engine.score(), 0);
    }
}
