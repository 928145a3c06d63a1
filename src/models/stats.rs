//! Hit statistics and judgement types.
//!
//! Judgement is binary: a note is either hit inside the window or missed.

/// Outcome of judging one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// Input matched a note inside the hit window.
    Hit { lane: usize },
    /// The note left the track unhit, or the echo input was wrong.
    Miss,
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitStats {
    pub hits: u32,
    pub misses: u32,
}

impl HitStats {
    /// Creates empty hit statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn judged(&self) -> u32 {
        self.hits + self.misses
    }

    /// Calculates accuracy percentage (0-100).
    pub fn calculate_accuracy(&self) -> f64 {
        let total = self.judged() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.hits as f64 / total * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_empty_is_zero() {
        assert_eq!(HitStats::new().calculate_accuracy(), 0.0);
    }

    #[test]
    fn test_accuracy_ratio() {
        let stats = HitStats { hits: 3, misses: 1 };
        assert_eq!(stats.judged(), 4);
        assert_eq!(stats.calculate_accuracy(), 75.0);
    }
}
