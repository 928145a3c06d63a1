//! Game-time scheduler for delayed events.
//!
//! Replaces nested timers: a game schedules an event `delay_ms` ahead and the
//! logic thread drains due events every frame. Every entry is stamped with the
//! scheduler generation; [`Scheduler::cancel_all`] bumps the generation so
//! anything from an earlier session is dropped instead of delivered.
//!
//! Draining is fenced: events scheduled while a batch is being processed are
//! never delivered in that same batch, even with a zero delay.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Scheduled<E> {
    due_ms: OrderedFloat<f64>,
    seq: u64,
    generation: u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    // Reversed: BinaryHeap is a max-heap and the earliest entry must be on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Identifies one scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub seq: u64,
}

pub struct Scheduler<E> {
    now_ms: f64,
    generation: u64,
    next_seq: u64,
    /// Entries with `seq >= fence` were scheduled during the current drain.
    fence: u64,
    queue: BinaryHeap<Scheduled<E>>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            generation: 0,
            next_seq: 0,
            fence: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Queues `event` to fire `delay_ms` from now (negative delays clamp to 0).
    pub fn schedule_after(&mut self, delay_ms: f64, event: E) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due_ms: OrderedFloat(self.now_ms + delay_ms.max(0.0)),
            seq,
            generation: self.generation,
            event,
        });
        Ticket {
            generation: self.generation,
            seq,
        }
    }

    /// Moves game time forward and opens a new drain batch.
    pub fn advance(&mut self, elapsed_ms: f64) {
        self.now_ms += elapsed_ms.max(0.0);
        self.fence = self.next_seq;
    }

    /// Next due event of the current batch, earliest first.
    pub fn pop_due(&mut self) -> Option<E> {
        loop {
            let top = self.queue.peek()?;
            if top.due_ms.0 > self.now_ms || top.seq >= self.fence {
                return None;
            }
            let entry = self.queue.pop()?;
            if entry.generation == self.generation {
                return Some(entry.event);
            }
            log::debug!(
                "SCHEDULER: Dropped stale event (generation {} != {})",
                entry.generation,
                self.generation
            );
        }
    }

    /// Drops every pending event and invalidates outstanding tickets.
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.queue.clear();
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
