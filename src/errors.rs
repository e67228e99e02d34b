use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::analyzer::{MIN_SENTENCES, MIN_WORDS};

/// Failures that end a reading-predictor run. None of them are retried.
#[derive(Debug)]
pub enum PipelineError {
    Io { path: PathBuf, source: io::Error },
    InsufficientContent { sentences: usize, words: usize },
    /// Every sentence was too long to fit under the sample cap.
    EmptySample,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            PipelineError::InsufficientContent { sentences, words } => write!(
                f,
                "File too short (needs {}+ sentences & {}+ words, found {} & {}).",
                MIN_SENTENCES, MIN_WORDS, sentences, words
            ),
            PipelineError::EmptySample => {
                write!(f, "No sentence is short enough to build a reading sample.")
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
