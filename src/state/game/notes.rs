//! Note stream - spawn, advance, retire, cleanup - and the spawn cadence.
//!
//! Updates are two-phase: notes are deactivated in place while iterating and
//! only removed by a later `cleanup`, so a note can never be judged after it
//! was retired, whatever order the frame's work runs in.

use crate::models::engine::Note;
use crate::models::settings::RhythmSettings;
use rand::Rng;

/// The live set of falling notes.
pub struct NoteStream {
    notes: Vec<Note>,
    next_id: u64,
    lane_count: usize,
    note_speed: f64,
    track_length: f64,
}

impl NoteStream {
    pub fn new(settings: &RhythmSettings) -> Self {
        Self {
            notes: Vec::new(),
            next_id: 0,
            lane_count: settings.lane_count,
            note_speed: settings.note_speed,
            track_length: settings.track_length,
        }
    }

    /// Appends a note in a uniformly random lane. Returns the lane.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> usize {
        let lane = rng.random_range(0..self.lane_count);
        self.spawn_in(lane);
        lane
    }

    /// Appends a note in `lane` at the top of the track. Returns its id.
    pub fn spawn_in(&mut self, lane: usize) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notes.push(Note::new(id, lane));
        id
    }

    /// Moves every active note by `note_speed * delta`. Active notes past the
    /// end of the track are deactivated; returns how many expired this call.
    /// Each note is counted at most once because it is deactivated here.
    pub fn advance(&mut self, delta: f64) -> u32 {
        let distance = self.note_speed * delta;
        let mut missed = 0;
        for note in self.notes.iter_mut().filter(|n| n.is_active()) {
            note.advance(distance);
            if note.position() > self.track_length && note.deactivate() {
                missed += 1;
            }
        }
        missed
    }

    /// Deactivates the note with `id`. `false` if unknown or already inactive.
    pub fn retire(&mut self, id: u64) -> bool {
        self.notes
            .iter_mut()
            .find(|n| n.id() == id)
            .is_some_and(|n| n.deactivate())
    }

    /// Drops inactive notes. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.notes.len();
        self.notes.retain(Note::is_active);
        before - self.notes.len()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.next_id = 0;
    }

    /// Every note still in the live set, including retired ones awaiting cleanup.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn active(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| n.is_active())
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }
}

/// Frames-between-spawns counter with the difficulty ramp.
#[derive(Debug, Clone)]
pub struct SpawnCadence {
    interval: u32,
    initial_interval: u32,
    min_interval: u32,
    ramp_step: u32,
    ramp_every_frames: u64,
    frame_count: u64,
    frames_since_spawn: u32,
    ramps: u32,
}

impl SpawnCadence {
    pub fn new(settings: &RhythmSettings) -> Self {
        Self {
            interval: settings.spawn_interval,
            initial_interval: settings.spawn_interval,
            min_interval: settings.min_spawn_interval,
            ramp_step: settings.ramp_step,
            ramp_every_frames: settings.ramp_every_frames.max(1),
            frame_count: 0,
            frames_since_spawn: 0,
            ramps: 0,
        }
    }

    /// Counts one frame. Returns `true` when a note is due.
    pub fn on_frame(&mut self) -> bool {
        self.frame_count += 1;
        if self.frame_count % self.ramp_every_frames == 0 {
            self.ramp();
        }

        self.frames_since_spawn += 1;
        if self.frames_since_spawn >= self.interval {
            self.frames_since_spawn = 0;
            true
        } else {
            false
        }
    }

    fn ramp(&mut self) {
        let next = self
            .interval
            .saturating_sub(self.ramp_step)
            .max(self.min_interval);
        if next < self.interval {
            self.interval = next;
            self.ramps += 1;
            log::debug!(
                "ENGINE: Spawn interval now {} frames (level {})",
                self.interval,
                self.level()
            );
        }
    }

    pub fn reset(&mut self) {
        self.interval = self.initial_interval;
        self.frame_count = 0;
        self.frames_since_spawn = 0;
        self.ramps = 0;
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// 1 at session start, +1 per interval decrease.
    pub fn level(&self) -> u32 {
        self.ramps + 1
    }
}
