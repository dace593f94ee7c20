//! Topic detection by keyword containment

use mentor_types::SkillCategory;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::vocabulary::{TopicKeyword, Vocabulary};

/// Maps message text to skill categories using a fixed keyword table
#[derive(Debug, Clone)]
pub struct TopicDetector {
    keywords: Vec<TopicKeyword>,
}

impl TopicDetector {
    /// Build a detector from the topic table of a vocabulary
    pub fn new(vocabulary: &Vocabulary) -> Self {
        Self {
            keywords: vocabulary.topics.clone(),
        }
    }

    /// Categories whose keywords occur anywhere in `text`, case-insensitively.
    ///
    /// An empty result means the message carries no topic signal.
    pub fn detect(&self, text: &str) -> BTreeSet<SkillCategory> {
        let lower = text.to_lowercase();

        self.keywords
            .iter()
            .filter(|entry| lower.contains(entry.keyword.as_str()))
            .flat_map(|entry| entry.categories.iter().cloned())
            .collect()
    }

    /// Number of keywords in the table
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for TopicDetector {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}

/// Detect topics with the built-in keyword table
pub fn detect_topics(text: &str) -> BTreeSet<SkillCategory> {
    static DETECTOR: OnceLock<TopicDetector> = OnceLock::new();
    DETECTOR.get_or_init(TopicDetector::default).detect(text)
}
