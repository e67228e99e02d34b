use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchStatus {
    Idle,
    Running,
    Stopped,
}

/// Elapsed-time accumulator. Time from earlier running windows is kept in
/// `baseline`; the current window is measured from `anchor`.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    status: StopwatchStatus,
    baseline: Duration,
    anchor: Option<Instant>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self { status: StopwatchStatus::Idle, baseline: Duration::ZERO, anchor: None }
    }

    pub fn status(&self) -> StopwatchStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == StopwatchStatus::Running
    }

    /// Returns false if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.status = StopwatchStatus::Running;
        self.anchor = Some(now);
        true
    }

    /// Returns false if not running.
    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        self.baseline = self.elapsed(now);
        self.anchor = None;
        self.status = StopwatchStatus::Stopped;
        true
    }

    /// Zero the clock. A running stopwatch keeps running from `now`.
    pub fn reset(&mut self, now: Instant) {
        if self.is_running() {
            self.baseline = Duration::ZERO;
            self.anchor = Some(now);
        } else {
            *self = Self::new();
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.status, self.anchor) {
            (StopwatchStatus::Running, Some(anchor)) => {
                self.baseline + now.saturating_duration_since(anchor)
            }
            _ => self.baseline,
        }
    }
}

/// Format as `HH:MM:SS.ss`, truncating to hundredths.
pub fn format_elapsed(elapsed: Duration) -> String {
    let centis = elapsed.as_millis() / 10;
    let hours = centis / 360_000;
    let minutes = centis / 6_000 % 60;
    let seconds = centis / 100 % 60;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_across_windows() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        assert!(sw.start(t0));
        assert!(sw.stop(t0 + Duration::from_secs(3)));
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(100)), Duration::from_secs(3));

        assert!(sw.start(t0 + Duration::from_secs(10)));
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(12)), Duration::from_secs(5));
        assert!(sw.stop(t0 + Duration::from_secs(14)));
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(20)), Duration::from_secs(7));
    }

    #[test]
    fn test_double_start_and_stop_are_ignored() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        assert!(!sw.stop(t0));
        assert!(sw.start(t0));
        assert!(!sw.start(t0 + Duration::from_secs(1)));
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(2)), Duration::from_secs(2));
    }

    #[test]
    fn test_reset_while_stopped_returns_to_idle() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.start(t0);
        sw.stop(t0 + Duration::from_secs(4));
        sw.reset(t0 + Duration::from_secs(6));
        assert_eq!(sw.status(), StopwatchStatus::Idle);
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(9)), Duration::ZERO);
    }

    #[test]
    fn test_reset_while_running_keeps_counting_from_zero() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.start(t0);
        sw.reset(t0 + Duration::from_secs(5));
        assert_eq!(sw.status(), StopwatchStatus::Running);
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(5)), Duration::ZERO);
        assert_eq!(sw.elapsed(t0 + Duration::from_secs(8)), Duration::from_secs(3));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.00");
        assert_eq!(format_elapsed(Duration::from_millis(61_250)), "00:01:01.25");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "01:02:03.00");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:00:59.99");
    }
}
