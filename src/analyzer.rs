use crate::errors::PipelineError;

pub const MIN_SENTENCES: usize = 5;
pub const MIN_WORDS: usize = 15;

/// A loaded text with its word and sentence tokens.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    words: Vec<String>,
    sentences: Vec<String>,
}

impl Document {
    pub fn new(text: String) -> Self {
        let words = text.split_whitespace().map(String::from).collect();
        let sentences = split_sentences(&text);
        Self { text, words, sentences }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn into_sentences(self) -> Vec<String> {
        self.sentences
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    pub word_count: usize,
    pub sentence_count: usize,
    pub char_count: usize,
    pub ari_score: f64,
}

/// Split on runs of `.`, `!` and `?`, trimming and dropping empty pieces.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Automated Readability Index, clamped at zero. Zero when either count is zero.
pub fn automated_readability_index(char_count: usize, word_count: usize, sentence_count: usize) -> f64 {
    if word_count == 0 || sentence_count == 0 {
        return 0.0;
    }
    let chars_per_word = char_count as f64 / word_count as f64;
    let words_per_sentence = word_count as f64 / sentence_count as f64;
    (4.71 * chars_per_word + 0.5 * words_per_sentence - 21.43).max(0.0)
}

/// Count words, sentences and alphanumeric characters, then score the text.
pub fn analyze(document: &Document) -> Result<AnalysisResult, PipelineError> {
    let word_count = document.words().len();
    let sentence_count = document.sentences().len();

    if sentence_count < MIN_SENTENCES || word_count < MIN_WORDS {
        return Err(PipelineError::InsufficientContent { sentences: sentence_count, words: word_count });
    }

    let char_count = document.text().chars().filter(|c| c.is_alphanumeric()).count();
    let ari_score = automated_readability_index(char_count, word_count, sentence_count);

    Ok(AnalysisResult { word_count, sentence_count, char_count, ari_score })
}
