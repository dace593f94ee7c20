//! Single-turn feedback signal extraction

use mentor_types::SkillAction;
use std::sync::OnceLock;

use crate::vocabulary::{SentimentLexicon, Vocabulary};

/// Classifies message text as `correct`, `confusion` or no signal.
///
/// Stateless: it cannot recognise `struggle`, which needs more than one turn.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    lexicon: SentimentLexicon,
}

impl SentimentClassifier {
    /// Build a classifier from the sentiment lexicon of a vocabulary
    pub fn new(vocabulary: &Vocabulary) -> Self {
        Self {
            lexicon: vocabulary.sentiment.clone(),
        }
    }

    /// First matching phrase list wins; `correct` is checked before `confusion`.
    pub fn classify(&self, text: &str) -> Option<SkillAction> {
        let lower = text.to_lowercase();
        let contains_any = |phrases: &[String]| phrases.iter().any(|p| lower.contains(p.as_str()));

        if contains_any(&self.lexicon.correct) {
            Some(SkillAction::Correct)
        } else if contains_any(&self.lexicon.confusion) {
            Some(SkillAction::Confusion)
        } else {
            None
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}

/// Classify with the built-in phrase lists
pub fn classify_sentiment(text: &str) -> Option<SkillAction> {
    static CLASSIFIER: OnceLock<SentimentClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(SentimentClassifier::default).classify(text)
}
