use std::time::{Duration, Instant};

use crate::countdown::{parse_duration, Countdown, CountdownEvent, CountdownStatus, TICK_PERIOD};
use crate::stopwatch::Stopwatch;
use crate::ticker::Interval;

pub const STOPWATCH_REFRESH_HZ: u32 = 60;
const MAX_INPUT_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFocus {
    Stopwatch,
    Countdown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub redraw: bool,
    pub expired: bool,
}

/// The stopwatch/timer tab: one free-running stopwatch and one countdown,
/// each with its own repeating interval.
#[derive(Debug)]
pub struct TimerPanel {
    pub focus: TimerFocus,
    pub stopwatch: Stopwatch,
    pub countdown: Countdown,
    input: String,
    stopwatch_redraw: Interval,
    countdown_tick: Interval,
}

impl Default for TimerPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerPanel {
    pub fn new() -> Self {
        Self {
            focus: TimerFocus::Stopwatch,
            stopwatch: Stopwatch::new(),
            countdown: Countdown::new(),
            input: String::new(),
            stopwatch_redraw: Interval::from_hz(STOPWATCH_REFRESH_HZ),
            countdown_tick: Interval::new(TICK_PERIOD),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn intervals(&self) -> [&Interval; 2] {
        [&self.stopwatch_redraw, &self.countdown_tick]
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            TimerFocus::Stopwatch => TimerFocus::Countdown,
            TimerFocus::Countdown => TimerFocus::Stopwatch,
        };
    }

    pub fn toggle_stopwatch(&mut self, now: Instant) {
        if self.stopwatch.is_running() {
            self.stopwatch.stop(now);
            self.stopwatch_redraw.pause();
        } else {
            self.stopwatch.start(now);
            self.stopwatch_redraw.resume(now);
        }
    }

    pub fn reset_stopwatch(&mut self, now: Instant) {
        self.stopwatch.reset(now);
        if !self.stopwatch.is_running() {
            self.stopwatch_redraw.pause();
        }
    }

    /// Only digits and `:` are accepted into the countdown field.
    pub fn push_input(&mut self, c: char) {
        if (c.is_ascii_digit() || c == ':') && self.input.len() < MAX_INPUT_LEN {
            self.input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Start the countdown from the typed value. Returns the parsed duration,
    /// or `None` if it was refused (zero, or already counting).
    pub fn start_countdown(&mut self, now: Instant) -> Option<Duration> {
        let target = parse_duration(&self.input);
        if !self.countdown.start(target) {
            return None;
        }
        self.countdown_tick.resume(now);
        log::info!("countdown started for {}s", target.as_secs());
        Some(target)
    }

    pub fn toggle_countdown_pause(&mut self, now: Instant) {
        match self.countdown.status() {
            CountdownStatus::Running => {
                self.countdown.pause();
                self.countdown_tick.pause();
            }
            CountdownStatus::Paused => {
                self.countdown.resume();
                self.countdown_tick.resume(now);
            }
            CountdownStatus::Idle | CountdownStatus::Expired => {}
        }
    }

    pub fn reset_countdown(&mut self) {
        self.countdown.reset();
        self.countdown_tick.pause();
    }

    /// Run whatever intervals are due.
    pub fn on_tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.stopwatch_redraw.poll(now) > 0 {
            outcome.redraw = true;
        }

        for _ in 0..self.countdown_tick.poll(now) {
            outcome.redraw = true;
            if self.countdown.tick() == Some(CountdownEvent::Expired) {
                outcome.expired = true;
                self.countdown_tick.pause();
                break;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_runs_to_single_expiry() {
        let t0 = Instant::now();
        let mut panel = TimerPanel::new();
        for c in "00:05".chars() {
            panel.push_input(c);
        }
        assert_eq!(panel.start_countdown(t0), Some(Duration::from_secs(5)));

        let mut expiries = 0;
        for step in 1..=100u32 {
            if panel.on_tick(t0 + TICK_PERIOD * step).expired {
                expiries += 1;
            }
        }
        assert_eq!(expiries, 1);
        assert_eq!(panel.countdown.status(), CountdownStatus::Expired);
        assert!(!panel.intervals()[1].is_active());
    }

    #[test]
    fn test_late_poll_catches_up_ticks() {
        let t0 = Instant::now();
        let mut panel = TimerPanel::new();
        panel.push_input('3');
        panel.start_countdown(t0);
        let outcome = panel.on_tick(t0 + Duration::from_millis(1_050));
        assert!(!outcome.expired);
        assert_eq!(panel.countdown.remaining(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_malformed_input_is_refused() {
        let mut panel = TimerPanel::new();
        panel.push_input('a');
        assert_eq!(panel.input(), "");
        assert_eq!(panel.start_countdown(Instant::now()), None);
        assert_eq!(panel.countdown.status(), CountdownStatus::Idle);
    }

    #[test]
    fn test_pause_halts_ticks() {
        let t0 = Instant::now();
        let mut panel = TimerPanel::new();
        panel.push_input('2');
        panel.start_countdown(t0);
        panel.toggle_countdown_pause(t0 + Duration::from_millis(50));
        assert!(!panel.intervals()[1].is_active());
        panel.on_tick(t0 + Duration::from_secs(10));
        assert_eq!(panel.countdown.remaining(), Duration::from_secs(2));
    }

    #[test]
    fn test_stopwatch_redraw_follows_running_state() {
        let t0 = Instant::now();
        let mut panel = TimerPanel::new();
        panel.toggle_stopwatch(t0);
        assert!(panel.intervals()[0].is_active());
        assert!(panel.on_tick(t0 + Duration::from_millis(20)).redraw);
        panel.toggle_stopwatch(t0 + Duration::from_secs(2));
        assert!(!panel.intervals()[0].is_active());
        assert_eq!(panel.stopwatch.elapsed(t0 + Duration::from_secs(9)), Duration::from_secs(2));
        panel.reset_stopwatch(t0 + Duration::from_secs(9));
        assert_eq!(panel.stopwatch.elapsed(t0 + Duration::from_secs(9)), Duration::ZERO);
    }

    #[test]
    fn test_reset_running_stopwatch_keeps_redrawing() {
        let t0 = Instant::now();
        let mut panel = TimerPanel::new();
        panel.toggle_stopwatch(t0);
        panel.reset_stopwatch(t0 + Duration::from_secs(30));
        assert!(panel.stopwatch.is_running());
        assert!(panel.intervals()[0].is_active());
        assert_eq!(panel.stopwatch.elapsed(t0 + Duration::from_secs(31)), Duration::from_secs(1));
    }

    #[test]
    fn test_focus_toggles() {
        let mut panel = TimerPanel::new();
        assert_eq!(panel.focus, TimerFocus::Stopwatch);
        panel.toggle_focus();
        assert_eq!(panel.focus, TimerFocus::Countdown);
    }
}
