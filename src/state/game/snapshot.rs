//! Snapshot creation for RhythmEngine.

use super::RhythmEngine;
use crate::shared::snapshot::{GameplaySnapshot, NoteView, ParticleView};
use crate::state::SessionPhase;
use crate::state::traits::Snapshot;

impl Snapshot for RhythmEngine {
    type Output = GameplaySnapshot;

    fn create_snapshot(&self) -> GameplaySnapshot {
        let notes = self
            .stream
            .active()
            .map(|n| NoteView {
                lane: n.lane(),
                position: n.position(),
                color_key: n.lane(),
            })
            .collect();

        let particles = self
            .particles
            .iter()
            .map(|p| ParticleView {
                x: p.x,
                y: p.y,
                radius: p.radius,
                alpha: p.alpha,
            })
            .collect();

        GameplaySnapshot {
            phase: self.phase,
            lane_labels: self.lane_labels.clone(),
            hit_line: self.hit_window.hit_line,
            hit_window: self.hit_window.tolerance,
            track_length: self.settings.track_length,
            notes,
            particles,
            score: self.tracker.score(),
            combo: self.tracker.combo(),
            max_combo: self.tracker.max_combo(),
            level: self.cadence.level(),
            misses: self.tracker.stats().misses,
            max_misses: self.settings.max_misses,
            last_judgement: self.last_judgement,
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
    use crate::logic::clock::FrameTick;
    use crate::models::settings::GameSettings;
    use crate::state::traits::Session;
    use crate::system::bus::SystemBus;

    #[test]
    fn test_snapshot_lists_active_notes_only() {
        let bus = SystemBus::new();
        let mut engine = RhythmEngine::with_seed(&GameSettings::default(), &bus, 5);
        engine.start();
        engine.stream_mut().spawn_in(0);
        engine.stream_mut().spawn_in(1);
        for _ in 0..125 {
            engine.tick(&FrameTick::frames(60));
        }
        engine.judge(0);

        let snap = engine.create_snapshot();
        assert_eq!(snap.phase, SessionPhase::Playing);
        assert_eq!(snap.lane_labels, vec!["Dha", "Na", "Ge", "Tin"]);
        // Cadence spawns are further up the track; only lane 1 is left on the line.
        let on_line: Vec<usize> = snap
            .notes
            .iter()
            .filter(|n| n.position == 500.0)
            .map(|n| n.lane)
            .collect();
        assert_eq!(on_line, vec![1]);
        assert_eq!(snap.particles.len(), 8);
        assert_eq!(snap.score, 100);
        assert_eq!(snap.result, None);
    }

    #[test]
    fn test_ended_snapshot_carries_result() {
        let bus = SystemBus::new();
        let mut engine = RhythmEngine::with_seed(&GameSettings::default(), &bus, 5);
        engine.start();
        let result = engine.stop();

        let snap = engine.create_snapshot();
        assert_eq!(snap.phase, SessionPhase::Ended);
        assert_eq!(snap.result, result);
    }
}
