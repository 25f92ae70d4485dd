use std::time::{Duration, Instant};

/// Recurring timer handle driven by the caller's loop.
///
/// A new ticker is stopped. Once started it is due immediately, then every
/// `interval`. Ticks missed while the loop was busy collapse into a single
/// firing instead of a burst.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }

    /// `None` while stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
