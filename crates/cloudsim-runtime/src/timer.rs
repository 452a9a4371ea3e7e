#![forbid(unsafe_code)]

//! Cancellable one-shot timers on a caller-supplied clock.
//!
//! [`TimerQueue`] never reads the wall clock itself. The real program feeds
//! it `Instant`-derived offsets, the simulator feeds it virtual time, and
//! both see identical firing order: by deadline, then by the order the
//! timers were scheduled.

use std::collections::BTreeMap;
use std::time::Duration;

/// Tag used to cancel related timers together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerGroup(pub u64);

/// Handle to one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<M> {
    group: TimerGroup,
    msg: M,
}

/// Pending timers keyed by `(deadline, sequence)`.
#[derive(Debug)]
pub struct TimerQueue<M> {
    entries: BTreeMap<(Duration, u64), Entry<M>>,
    next_seq: u64,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TimerQueue<M> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `msg` to fire at `now + delay`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, group: TimerGroup, msg: M) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = now.saturating_add(delay);
        self.entries.insert((deadline, seq), Entry { group, msg });
        TimerId(seq)
    }

    /// Drop one timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.entries.keys().find(|(_, seq)| *seq == id.0).copied();
        key.and_then(|k| self.entries.remove(&k)).is_some()
    }

    /// Drop every pending timer in `group`. Returns how many were dropped.
    pub fn cancel_group(&mut self, group: TimerGroup) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.group != group);
        before - self.entries.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, M)> {
        let (&(deadline, seq), _) = self.entries.iter().next()?;
        if deadline > now {
            return None;
        }
        self.entries
            .remove(&(deadline, seq))
            .map(|entry| (deadline, entry.msg))
    }

    /// Number of pending timers in `group`.
    pub fn pending_in(&self, group: TimerGroup) -> usize {
        self.entries.values().filter(|e| e.group == group).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
