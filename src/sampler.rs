use rand::seq::SliceRandom;
use rand::Rng;

/// Word-count window for a calibration sample: at least `min_words`, always
/// fewer than `max_words`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLimits {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self { min_words: 15, max_words: 75 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingSample {
    sentences: Vec<String>,
    word_count: usize,
}

impl ReadingSample {
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentences joined with `". "` and closed with a period.
    pub fn text(&self) -> String {
        format!("{}.", self.sentences.join(". "))
    }
}

/// Shuffle the sentences and take them in order while they fit under the cap,
/// stopping as soon as the minimum is reached. Short inputs may end below the minimum.
pub fn select_sample<R: Rng + ?Sized>(
    mut sentences: Vec<String>,
    limits: SampleLimits,
    rng: &mut R,
) -> ReadingSample {
    sentences.shuffle(rng);

    let mut picked = Vec::new();
    let mut running = 0;

    for sentence in sentences {
        let len = sentence.split_whitespace().count();
        if running + len < limits.max_words {
            picked.push(sentence);
            running += len;
        }
        if running >= limits.min_words {
            break;
        }
    }

    log::debug!("selected {} sentences ({} words) for calibration", picked.len(), running);

    ReadingSample { sentences: picked, word_count: running }
}
