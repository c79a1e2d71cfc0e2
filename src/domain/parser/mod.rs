//! Message parser: classification, field extraction and normalisation.
//!
//! Pure and synchronous. The only inputs besides the text are the subject vocabulary
//! and period labels, injected once at startup through [`ParserConfig`].

pub mod classifier;
pub mod clock;
pub mod duration;
pub mod extract;
pub mod normalize;
pub mod subject;

pub use normalize::{normalize_digits, to_24h};
pub use subject::{DEFAULT_SUBJECTS, SubjectVocabulary, TAG_SEPARATOR};

use crate::domain::{ClassifiedIntent, ParseFailure, ParseOutcome, Period};
use std::collections::HashMap;

/// Display labels for periods. Logic branches on [`Period`], never on labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLabels {
    labels: HashMap<Period, String>,
}

impl PeriodLabels {
    pub fn new(labels: HashMap<Period, String>) -> Self {
        Self { labels }
    }

    /// Label shown to users; falls back to the period key when unmapped.
    pub fn label(&self, period: Period) -> &str {
        self.labels
            .get(&period)
            .map(String::as_str)
            .unwrap_or_else(|| period.key())
    }
}

impl Default for PeriodLabels {
    fn default() -> Self {
        Self::new(HashMap::from([
            (Period::Morning, "朝".to_string()),
            (Period::Noon, "昼".to_string()),
            (Period::Evening, "夕方".to_string()),
            (Period::Night, "夜".to_string()),
        ]))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    pub subjects: SubjectVocabulary,
    pub period_labels: PeriodLabels,
}

/// Stateless parser; share it via `Arc` across tasks.
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    config: ParserConfig,
}

impl MessageParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn period_labels(&self) -> &PeriodLabels {
        &self.config.period_labels
    }

    pub fn classify(&self, text: &str) -> ClassifiedIntent {
        classifier::classify(&normalize_digits(text.trim()), &self.config.subjects)
    }

    /// Classifies `raw_text` and runs only the chosen intent's extractor.
    ///
    /// Never panics and never returns an error: every problem becomes a
    /// [`ParseFailure`] carrying the original text.
    pub fn handle(&self, raw_text: &str) -> ParseOutcome {
        self.handle_classified(raw_text).1
    }

    /// Like [`handle`](Self::handle), also returning the classifier's verdict. A message
    /// classified as a notification can still end in a failure outcome.
    pub fn handle_classified(&self, raw_text: &str) -> (ClassifiedIntent, ParseOutcome) {
        let text = normalize_digits(raw_text.trim());
        let vocab = &self.config.subjects;
        let (intent, result) = match classifier::matching_rule(&text, vocab) {
            Some(rule) => (rule.intent, (rule.extract)(&text, vocab)),
            None => (
                ClassifiedIntent::Unrecognized,
                Err(classifier::diagnose(&text, vocab)),
            ),
        };
        let outcome = result
            .unwrap_or_else(|reason| ParseOutcome::Failure(ParseFailure::new(reason, raw_text)));
        (intent, outcome)
    }
}
