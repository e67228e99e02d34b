use std::time::{Duration, Instant};

use crate::sampler::ReadingSample;
use crate::stopwatch::Stopwatch;

/// Shortest reading time used for the speed calculation.
pub const MIN_ELAPSED_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationState {
    Idle,
    Running,
    Stopped,
    Analyzed(CalibrationMeasurement),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationMeasurement {
    pub elapsed_seconds: f64,
    pub wpm: f64,
}

impl CalibrationMeasurement {
    pub fn new(sample_words: usize, elapsed: Duration) -> Self {
        let elapsed_seconds = elapsed.as_secs_f64().max(MIN_ELAPSED_SECS);
        let wpm = sample_words as f64 / elapsed_seconds * 60.0;
        Self { elapsed_seconds, wpm }
    }
}

/// Modal reading test: the user starts a stopwatch, reads the sample and
/// confirms. Ends either `Analyzed` or `Cancelled`.
#[derive(Debug, Clone)]
pub struct Calibration {
    sample: ReadingSample,
    stopwatch: Stopwatch,
    state: CalibrationState,
}

impl Calibration {
    pub fn new(sample: ReadingSample) -> Self {
        Self { sample, stopwatch: Stopwatch::new(), state: CalibrationState::Idle }
    }

    pub fn sample(&self) -> &ReadingSample {
        &self.sample
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, CalibrationState::Analyzed(_) | CalibrationState::Cancelled)
    }

    /// Idle or Stopped to Running.
    pub fn start(&mut self, now: Instant) -> bool {
        if !matches!(self.state, CalibrationState::Idle | CalibrationState::Stopped) {
            return false;
        }
        self.stopwatch.start(now);
        self.state = CalibrationState::Running;
        true
    }

    pub fn stop(&mut self, now: Instant) -> bool {
        if self.state != CalibrationState::Running {
            return false;
        }
        self.stopwatch.stop(now);
        self.state = CalibrationState::Stopped;
        true
    }

    /// Stop if running, then measure. Needs some elapsed time; from Idle or
    /// with nothing measured the state is left unchanged and `None` returned.
    pub fn analyze(&mut self, now: Instant) -> Option<CalibrationMeasurement> {
        self.stop(now);
        if self.state != CalibrationState::Stopped {
            return None;
        }
        let elapsed = self.stopwatch.elapsed(now);
        if elapsed.is_zero() {
            return None;
        }
        let measurement = CalibrationMeasurement::new(self.sample.word_count(), elapsed);
        log::info!(
            "calibration: {} words in {:.2}s = {:.0} WPM",
            self.sample.word_count(),
            measurement.elapsed_seconds,
            measurement.wpm
        );
        self.state = CalibrationState::Analyzed(measurement);
        Some(measurement)
    }

    /// Abandon from any non-terminal state.
    pub fn cancel(&mut self, now: Instant) -> bool {
        if self.is_finished() {
            return false;
        }
        self.stopwatch.stop(now);
        self.state = CalibrationState::Cancelled;
        log::info!("calibration cancelled");
        true
    }

    /// Value handed back when the modal closes: WPM, or 0.0 when cancelled.
    pub fn result_wpm(&self) -> Option<f64> {
        match self.state {
            CalibrationState::Analyzed(m) => Some(m.wpm),
            CalibrationState::Cancelled => Some(0.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{select_sample, SampleLimits};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn calibration_with_words(words: usize) -> Calibration {
        let sentences = vec![vec!["word"; words].join(" ")];
        let mut rng = StdRng::seed_from_u64(0);
        let limits = SampleLimits { min_words: 1, max_words: 75 };
        Calibration::new(select_sample(sentences, limits, &mut rng))
    }

    #[test]
    fn test_start_stop_analyze() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(30);
        assert_eq!(calib.state(), CalibrationState::Idle);
        assert!(calib.start(t0));
        assert!(calib.stop(t0 + Duration::from_secs(10)));
        let m = calib.analyze(t0 + Duration::from_secs(20)).unwrap();
        assert_eq!(m.elapsed_seconds, 10.0);
        assert_eq!(m.wpm, 180.0);
        assert_eq!(calib.result_wpm(), Some(180.0));
    }

    #[test]
    fn test_analyze_while_running_stops_first() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(20);
        calib.start(t0);
        let m = calib.analyze(t0 + Duration::from_secs(30)).unwrap();
        assert!((m.wpm - 40.0).abs() < 1e-9);
        assert!(calib.is_finished());
    }

    #[test]
    fn test_short_reading_is_clamped_to_one_second() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(20);
        calib.start(t0);
        let m = calib.analyze(t0 + Duration::from_millis(200)).unwrap();
        assert_eq!(m.elapsed_seconds, 1.0);
        assert_eq!(m.wpm, 1200.0);
        assert!(m.wpm.is_finite());
    }

    #[test]
    fn test_analyze_from_idle_is_rejected() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(20);
        assert_eq!(calib.analyze(t0), None);
        assert_eq!(calib.state(), CalibrationState::Idle);
    }

    #[test]
    fn test_analyze_with_zero_elapsed_is_rejected() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(20);
        calib.start(t0);
        calib.stop(t0);
        assert_eq!(calib.analyze(t0), None);
        assert_eq!(calib.state(), CalibrationState::Stopped);
    }

    #[test]
    fn test_cancel_returns_zero_and_is_terminal() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(20);
        calib.start(t0);
        assert!(calib.cancel(t0 + Duration::from_secs(1)));
        assert_eq!(calib.result_wpm(), Some(0.0));
        assert!(!calib.start(t0 + Duration::from_secs(2)));
        assert_eq!(calib.analyze(t0 + Duration::from_secs(3)), None);
        assert_eq!(calib.state(), CalibrationState::Cancelled);
    }

    #[test]
    fn test_resume_after_stop_accumulates() {
        let t0 = Instant::now();
        let mut calib = calibration_with_words(60);
        calib.start(t0);
        calib.stop(t0 + Duration::from_secs(10));
        calib.start(t0 + Duration::from_secs(50));
        let m = calib.analyze(t0 + Duration::from_secs(60)).unwrap();
        assert_eq!(m.elapsed_seconds, 20.0);
        assert_eq!(m.wpm, 180.0);
    }
}
