use std::fmt;

use crate::utilities::format_thousands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeLevel {
    Kindergarten,
    Grade(u8),
    HighSchool,
    College,
}

impl GradeLevel {
    /// Bucket an ARI score by rounding it up. Every input, NaN included, lands
    /// in exactly one bucket.
    pub fn from_ari(ari: f64) -> Self {
        let level = ari.ceil();
        if level > 14.0 {
            GradeLevel::College
        } else if level > 12.0 {
            GradeLevel::HighSchool
        } else if level >= 1.0 {
            GradeLevel::Grade(level as u8)
        } else {
            GradeLevel::Kindergarten
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeLevel::Kindergarten => write!(f, "Kindergarten"),
            GradeLevel::Grade(n) => write!(f, "Grade {}", n),
            GradeLevel::HighSchool => write!(f, "High School"),
            GradeLevel::College => write!(f, "College"),
        }
    }
}

/// Everything measured for one document, ready to be turned into a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingSession {
    pub total_words: usize,
    pub ari_score: f64,
    pub wpm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_words: usize,
    pub ari_score: f64,
    pub grade: GradeLevel,
    pub wpm: f64,
    pub estimated_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Report(Report),
    Cancelled,
}

impl ReadingSession {
    /// A non-positive speed means the calibration was skipped.
    pub fn finish(self) -> SessionOutcome {
        if !self.wpm.is_finite() || self.wpm <= 0.0 {
            return SessionOutcome::Cancelled;
        }
        SessionOutcome::Report(Report {
            total_words: self.total_words,
            ari_score: self.ari_score,
            grade: GradeLevel::from_ari(self.ari_score),
            wpm: self.wpm,
            estimated_minutes: self.total_words as f64 / self.wpm,
        })
    }
}

impl Report {
    pub fn to_markdown(&self) -> String {
        format!(
            "## Analysis Complete\n\n\
             **Total Words:** {}\n\
             **Readability (ARI):** {:.1} ({})\n\
             **Your Speed:** {:.0} WPM\n\
             **Time to Finish:** {:.1} minutes",
            format_thousands(self.total_words),
            self.ari_score,
            self.grade,
            self.wpm,
            self.estimated_minutes
        )
    }
}
