//! Falling note data.

/// A note travelling down one lane.
///
/// Only the note stream moves a note and only judgement or expiry deactivates
/// it. Once inactive it is never mutated again.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    id: u64,
    lane: usize,
    position: f64,
    active: bool,
}

impl Note {
    /// Creates an active note at the top of the track.
    pub fn new(id: u64, lane: usize) -> Self {
        Self {
            id,
            lane,
            position: 0.0,
            active: true,
        }
    }

    /// Spawn order. Later notes have larger ids.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Moves an active note further down the track. Inactive notes stay put.
    pub(crate) fn advance(&mut self, distance: f64) {
        if self.active {
            self.position += distance;
        }
    }

    /// Returns `true` only for the call that actually deactivated the note.
    pub(crate) fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_once() {
        let mut note = Note::new(0, 2);
        assert!(note.deactivate());
        assert!(!note.deactivate());
        assert!(!note.is_active());
    }

    #[test]
    fn test_inactive_note_does_not_move() {
        let mut note = Note::new(0, 1);
        note.advance(4.0);
        note.deactivate();
        note.advance(4.0);
        assert_eq!(note.position(), 4.0);
    }
}
