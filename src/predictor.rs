use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::Rng;

use crate::analyzer::{analyze, AnalysisResult, Document};
use crate::calibration::Calibration;
use crate::errors::PipelineError;
use crate::markdown::escape_markdown;
use crate::reading_session::{ReadingSession, SessionOutcome};
use crate::sampler::{select_sample, SampleLimits};
use crate::ticker::Interval;
use crate::utilities::read_text_file;

pub const IDLE_MESSAGE: &str = "Select a file to begin...";
pub const CANCELLED_MESSAGE: &str = "Analysis Cancelled.";

/// Stopwatch redraw rate inside the calibration modal.
pub const CALIBRATION_REFRESH_HZ: u32 = 60;

/// A file that passed analysis and is waiting for its reading-speed test.
#[derive(Debug)]
pub struct PendingRun {
    pub path: PathBuf,
    pub analysis: AnalysisResult,
    pub calibration: Calibration,
}

/// Load, analyze and sample a file. Stops at the first failure.
pub fn prepare_run<R: Rng + ?Sized>(
    path: &Path,
    limits: SampleLimits,
    rng: &mut R,
) -> Result<PendingRun, PipelineError> {
    let text = read_text_file(path).map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    log::info!("loaded {} ({} bytes)", path.display(), text.len());

    let document = Document::new(text);
    let analysis = analyze(&document)?;

    log::info!(
        "{}: {} words, {} sentences, {} alphanumeric chars, ARI {:.2}",
        path.display(),
        analysis.word_count,
        analysis.sentence_count,
        analysis.char_count,
        analysis.ari_score
    );

    let sample = select_sample(document.into_sentences(), limits, rng);
    if sample.is_empty() {
        return Err(PipelineError::EmptySample);
    }

    Ok(PendingRun { path: path.to_path_buf(), analysis, calibration: Calibration::new(sample) })
}

/// State behind the reading tab: the results panel text and, while a
/// calibration modal is open, the run it belongs to.
#[derive(Debug)]
pub struct ReadingPredictor {
    limits: SampleLimits,
    results: String,
    pending: Option<PendingRun>,
    redraw: Interval,
}

impl ReadingPredictor {
    pub fn new(limits: SampleLimits) -> Self {
        Self {
            limits,
            results: IDLE_MESSAGE.to_string(),
            pending: None,
            redraw: Interval::from_hz(CALIBRATION_REFRESH_HZ),
        }
    }

    /// Markdown for the results panel.
    pub fn results(&self) -> &str {
        &self.results
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.pending.as_ref().map(|run| &run.calibration)
    }

    pub fn redraw_interval(&self) -> &Interval {
        &self.redraw
    }

    pub fn redraw_interval_mut(&mut self) -> &mut Interval {
        &mut self.redraw
    }

    /// Start a new run for `path`, discarding any open calibration. On
    /// success the calibration modal is pending.
    pub fn select_file<R: Rng + ?Sized>(&mut self, path: &Path, rng: &mut R) -> Result<(), PipelineError> {
        self.pending = None;
        self.redraw.pause();
        self.results = "Processing file...".to_string();

        match prepare_run(path, self.limits, rng) {
            Ok(run) => {
                self.pending = Some(run);
                Ok(())
            }
            Err(err) => {
                log::warn!("reading analysis failed: {}", err);
                self.results = match &err {
                    PipelineError::InsufficientContent { .. } => "Analysis failed: File too short.".to_string(),
                    other => format!("Error: {}", escape_markdown(&other.to_string())),
                };
                Err(err)
            }
        }
    }

    pub fn start(&mut self, now: Instant) {
        if let Some(run) = self.pending.as_mut() {
            if run.calibration.start(now) {
                self.redraw.resume(now);
            }
        }
    }

    pub fn stop(&mut self, now: Instant) {
        if let Some(run) = self.pending.as_mut() {
            run.calibration.stop(now);
            self.redraw.pause();
        }
    }

    /// Confirm the reading. Returns the outcome once the modal can close.
    pub fn analyze(&mut self, now: Instant) -> Option<SessionOutcome> {
        let run = self.pending.as_mut()?;
        run.calibration.analyze(now)?;
        self.close()
    }

    pub fn cancel(&mut self, now: Instant) -> Option<SessionOutcome> {
        let run = self.pending.as_mut()?;
        run.calibration.cancel(now);
        self.close()
    }

    fn close(&mut self) -> Option<SessionOutcome> {
        let wpm = self.pending.as_ref()?.calibration.result_wpm()?;
        let run = self.pending.take()?;
        self.redraw.pause();
        log::info!("calibration for {} closed at {:.0} WPM", run.path.display(), wpm);

        let outcome = ReadingSession {
            total_words: run.analysis.word_count,
            ari_score: run.analysis.ari_score,
            wpm,
        }
        .finish();

        self.results = match &outcome {
            SessionOutcome::Report(report) => report.to_markdown(),
            SessionOutcome::Cancelled => CANCELLED_MESSAGE.to_string(),
        };
        Some(outcome)
    }
}
