use std::time::Duration;

/// Fixed tick period of the countdown.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    status: CountdownStatus,
    target: Duration,
    remaining: Duration,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self { status: CountdownStatus::Idle, target: Duration::ZERO, remaining: Duration::ZERO }
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Start counting down from `target`. Refused while running or paused,
    /// and for a zero duration.
    pub fn start(&mut self, target: Duration) -> bool {
        if matches!(self.status, CountdownStatus::Running | CountdownStatus::Paused) || target.is_zero() {
            return false;
        }
        self.status = CountdownStatus::Running;
        self.target = target;
        self.remaining = target;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.status != CountdownStatus::Running {
            return false;
        }
        self.status = CountdownStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != CountdownStatus::Paused {
            return false;
        }
        self.status = CountdownStatus::Running;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance by one tick. Returns `Expired` exactly once, on the tick that
    /// reaches zero.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if self.status != CountdownStatus::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(TICK_PERIOD);
        if self.remaining.is_zero() {
            self.status = CountdownStatus::Expired;
            log::info!("countdown of {}s expired", self.target.as_secs());
            return Some(CountdownEvent::Expired);
        }
        None
    }
}

/// Parse `HH:MM:SS`, `MM:SS` or bare seconds. Anything else is zero.
pub fn parse_duration(input: &str) -> Duration {
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.len() > 3 {
        return Duration::ZERO;
    }

    let mut total: u64 = 0;
    for part in parts {
        let Ok(value) = part.trim().parse::<u64>() else {
            return Duration::ZERO;
        };
        total = match total.checked_mul(60).and_then(|t| t.checked_add(value)) {
            Some(t) => t,
            None => return Duration::ZERO,
        };
    }
    Duration::from_secs(total)
}

/// Format remaining time as `HH:MM:SS.s`.
pub fn format_remaining(remaining: Duration) -> String {
    let tenths = remaining.as_millis() / 100;
    let secs = tenths / 10;
    format!("{:02}:{:02}:{:02}.{}", secs / 3600, secs / 60 % 60, secs % 60, tenths % 10)
}
