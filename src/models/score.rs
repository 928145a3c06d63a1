//! Score and combo tracking.
//!
//! The tracker is the only writer of score, combo and hit statistics. Games
//! feed it [`Judgement`]s and read the values back for display.

use crate::models::stats::{HitStats, Judgement};

/// Points for any hit before the combo bonus.
pub const BASE_HIT_SCORE: u64 = 100;
/// Extra points per combo step already held when the hit lands.
pub const COMBO_BONUS: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTracker {
    score: u64,
    combo: u32,
    max_combo: u32,
    stats: HitStats,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards `100 + 10 * combo` using the combo from before this hit, then
    /// extends the combo. Returns the points awarded.
    pub fn on_hit(&mut self, lane: usize) -> u64 {
        let awarded = BASE_HIT_SCORE + COMBO_BONUS * self.combo as u64;
        self.score += awarded;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.stats.hits += 1;
        log::trace!(
            "SCORE: lane {} hit for {} (combo {})",
            lane,
            awarded,
            self.combo
        );
        awarded
    }

    /// Breaks the combo. Score is untouched.
    pub fn on_miss(&mut self) {
        self.combo = 0;
        self.stats.misses += 1;
    }

    pub fn apply(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Hit { lane } => {
                self.on_hit(lane);
            }
            Judgement::Miss => self.on_miss(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn stats(&self) -> HitStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_awards_base() {
        let mut tracker = ScoreTracker::new();
        assert_eq!(tracker.on_hit(0), 100);
        assert_eq!(tracker.score(), 100);
        assert_eq!(tracker.combo(), 1);
    }

    #[test]
    fn test_three_hits_scale_with_combo() {
        let mut tracker = ScoreTracker::new();
        let awards: Vec<u64> = (0..3).map(|lane| tracker.on_hit(lane)).collect();
        assert_eq!(awards, vec![100, 110, 120]);
        assert_eq!(tracker.score(), 330);
        assert_eq!(tracker.combo(), 3);
    }

    #[test]
    fn test_hit_formula_holds_over_a_run() {
        let mut tracker = ScoreTracker::new();
        for i in 0..25 {
            if i % 7 == 6 {
                tracker.on_miss();
                continue;
            }
            let before_score = tracker.score();
            let before_combo = tracker.combo();
            tracker.on_hit(i % 4);
            assert_eq!(tracker.score(), before_score + 100 + 10 * before_combo as u64);
            assert_eq!(tracker.combo(), before_combo + 1);
        }
    }

    #[test]
    fn test_miss_resets_combo_only() {
        let mut tracker = ScoreTracker::new();
        for _ in 0..5 {
            tracker.on_hit(1);
        }
        let score = tracker.score();
        tracker.on_miss();
        assert_eq!(tracker.combo(), 0);
        assert_eq!(tracker.score(), score);
        assert_eq!(tracker.max_combo(), 5);

        tracker.on_miss();
        assert_eq!(tracker.combo(), 0);
        assert_eq!(tracker.stats(), HitStats { hits: 5, misses: 2 });
    }

    #[test]
    fn test_apply_and_reset() {
        let mut tracker = ScoreTracker::new();
        tracker.apply(Judgement::Hit { lane: 2 });
        tracker.apply(Judgement::Hit { lane: 3 });
        tracker.apply(Judgement::Miss);
        assert_eq!(tracker.score(), 210);
        assert_eq!(tracker.combo(), 0);

        tracker.reset();
        assert_eq!(tracker, ScoreTracker::new());
    }
}
