use std::time::{Duration, Instant};

/// A repeating callback slot polled by the event loop. Starts paused; the
/// owner resumes and pauses it explicitly so nothing keeps ticking after
/// the component stops.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next_due: None }
    }

    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn resume(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn pause(&mut self) {
        self.next_due = None;
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Number of whole periods that elapsed since the last poll. Zero while paused.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}

/// Time until the earliest active interval is due, capped at `max_wait`.
pub fn poll_timeout<'a, I>(intervals: I, now: Instant, max_wait: Duration) -> Duration
where
    I: IntoIterator<Item = &'a Interval>,
{
    intervals
        .into_iter()
        .filter_map(Interval::next_due)
        .map(|due| due.saturating_duration_since(now))
        .fold(max_wait, Duration::min)
}
