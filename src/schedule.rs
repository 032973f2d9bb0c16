//! One-shot timers on a single monotonic clock
//!
//! Screens schedule `(fire_at, action)` pairs and poll them once per frame
//! with the current time. Nothing runs behind the owner's back: an action is
//! only delivered from `poll`, and after `teardown` nothing is delivered at all.

/// Handle for a scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<A> {
    id: TimerId,
    fire_at: f64,
    action: A,
}

/// Pending one-shot actions, ordered by fire time then scheduling order
#[derive(Debug)]
pub struct Schedule<A> {
    entries: Vec<Entry<A>>,
    next_id: u64,
    torn_down: bool,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Schedule<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            torn_down: false,
        }
    }

    /// Schedule `action` to fire `delay_ms` after `now`.
    ///
    /// Returns `None` once the schedule has been torn down.
    pub fn after(&mut self, now: f64, delay_ms: f64, action: A) -> Option<TimerId> {
        if self.torn_down {
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            fire_at: now + delay_ms.max(0.0),
            action,
        });
        Some(id)
    }

    /// Cancel one pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending action, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Cancel everything and refuse further scheduling
    pub fn teardown(&mut self) {
        let dropped = self.cancel_all();
        if dropped > 0 {
            log::debug!("Schedule torn down with {} pending timers", dropped);
        }
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Number of actions still waiting to fire
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Earliest pending fire time
    pub fn next_deadline(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.fire_at)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Remove and return every action due at `now`, earliest first.
    ///
    /// Ties keep scheduling order.
    pub fn poll(&mut self, now: f64) -> Vec<A> {
        if self.torn_down {
            return Vec::new();
        }
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].fire_at <= now {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|e| e.action).collect()
    }
}
