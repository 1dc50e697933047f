use std::time::{Duration, Instant};

/// Fixed-rate send schedule for one connection.
///
/// The deadline advances by exactly one interval per send, independent of
/// when the send really happened, so a slow cycle is never padded further
/// and a fast one waits out the rest of its slot.
#[derive(Clone, Debug)]
pub struct Pacer {
    interval: Duration,
    next_send: Instant,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next_send: start,
        }
    }

    pub fn next_send(&self) -> Instant {
        self.next_send
    }

    /// How long a send attempted at `now` has to wait.
    pub fn delay(&self, now: Instant) -> Duration {
        self.next_send.saturating_duration_since(now)
    }

    /// Book the slot that was just used.
    pub fn advance(&mut self) {
        self.next_send += self.interval;
    }
}
