//! Keyword vocabulary for topic and sentiment detection
//!
//! The vocabulary is data, not code: it can be loaded from a YAML file so new
//! keywords only require editing that file.
//!
//! ```yaml
//! topics:
//!   - keyword: recursion
//!     categories: [Recursion, DSA]
//! sentiment:
//!   correct: [understood, got it]
//!   confusion: [confused]
//! ```

use anyhow::{Context, Result};
use mentor_types::{MentorError, SkillCategory};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Phrases signalling that the learner understood
const DEFAULT_CORRECT_PHRASES: &[&str] = &["understood", "got it", "thanks", "clear"];
/// Phrases signalling that the learner is confused
const DEFAULT_CONFUSION_PHRASES: &[&str] = &["confused", "dont understand", "hard", "what?"];

/// One keyword and the categories it signals
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicKeyword {
    /// Substring searched for in lowercased message text
    pub keyword: String,
    /// Categories added to the result when the keyword is present
    pub categories: Vec<SkillCategory>,
}

impl TopicKeyword {
    /// Create a keyword entry
    pub fn new(keyword: &str, categories: &[SkillCategory]) -> Self {
        Self {
            keyword: keyword.to_string(),
            categories: categories.to_vec(),
        }
    }
}

/// Phrase lists used by the sentiment classifier
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentimentLexicon {
    /// Phrases mapped to a `correct` signal (checked first)
    #[serde(default = "default_correct")]
    pub correct: Vec<String>,
    /// Phrases mapped to a `confusion` signal
    #[serde(default = "default_confusion")]
    pub confusion: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            correct: default_correct(),
            confusion: default_confusion(),
        }
    }
}

fn default_correct() -> Vec<String> {
    DEFAULT_CORRECT_PHRASES.iter().map(|p| (*p).to_string()).collect()
}

fn default_confusion() -> Vec<String> {
    DEFAULT_CONFUSION_PHRASES.iter().map(|p| (*p).to_string()).collect()
}

/// Complete detection vocabulary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vocabulary {
    /// Keyword to categories table, tested in order
    #[serde(default = "default_topics")]
    pub topics: Vec<TopicKeyword>,
    /// Sentiment phrase lists
    #[serde(default)]
    pub sentiment: SentimentLexicon,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            sentiment: SentimentLexicon::default(),
        }
    }
}

fn default_topics() -> Vec<TopicKeyword> {
    use SkillCategory::{ComplexityAnalysis, CppSyntax, Dp, Dsa, Recursion, SystemDesign};

    vec![
        TopicKeyword::new("recursion", &[Recursion, Dsa]),
        TopicKeyword::new("recursive", &[Recursion, Dsa]),
        TopicKeyword::new("dp", &[Dp, Dsa]),
        TopicKeyword::new("dynamic", &[Dp, Dsa]),
        TopicKeyword::new("design", &[SystemDesign]),
        TopicKeyword::new("scaling", &[SystemDesign]),
        TopicKeyword::new("cpp", &[CppSyntax]),
        TopicKeyword::new("c++", &[CppSyntax]),
        TopicKeyword::new("vector", &[CppSyntax, Dsa]),
        TopicKeyword::new("complexity", &[ComplexityAnalysis]),
        TopicKeyword::new("big o", &[ComplexityAnalysis]),
    ]
}

impl Vocabulary {
    /// Default vocabulary file: ~/.mentor/vocabulary.yaml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".mentor").join("vocabulary.yaml"))
    }

    /// Parse a vocabulary from YAML and normalize it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let vocabulary: Vocabulary =
            serde_yaml::from_str(yaml).with_context(|| "Failed to parse vocabulary YAML")?;
        Ok(vocabulary.normalized()?)
    }

    /// Load a vocabulary file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary {:?}", path))?;
        let vocabulary = Self::from_yaml(&content)
            .with_context(|| format!("Failed to load vocabulary from {:?}", path))?;

        info!(
            "Loaded vocabulary from {:?}: {} topic keywords",
            path,
            vocabulary.topics.len()
        );
        Ok(vocabulary)
    }

    /// Load `path` if given, else the default file if it exists, else the built-in table
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(default) if default.is_file() => Self::from_file(&default),
            _ => {
                debug!("No vocabulary file found, using built-in keyword table");
                Ok(Self::default())
            }
        }
    }

    /// Lowercase and trim every keyword and phrase, rejecting unusable entries
    pub fn normalized(mut self) -> mentor_types::Result<Self> {
        for entry in &mut self.topics {
            entry.keyword = entry.keyword.trim().to_lowercase();

            if entry.keyword.is_empty() {
                return Err(MentorError::Vocabulary(
                    "topic keyword cannot be empty".to_string(),
                ));
            }
            if entry.categories.is_empty() {
                return Err(MentorError::Vocabulary(format!(
                    "topic keyword '{}' has no categories",
                    entry.keyword
                )));
            }
        }

        for phrases in [&mut self.sentiment.correct, &mut self.sentiment.confusion] {
            phrases.retain(|p| !p.trim().is_empty());
            for phrase in phrases.iter_mut() {
                *phrase = phrase.trim().to_lowercase();
            }
        }

        if self.topics.is_empty() {
            warn!("Vocabulary has no topic keywords; no topics will ever be detected");
        }

        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_known_keywords() {
        let vocabulary = Vocabulary::default();
        assert_eq!(vocabulary.topics.len(), 11);

        let vector = vocabulary
            .topics
            .iter()
            .find(|t| t.keyword == "vector")
            .unwrap();
        assert_eq!(
            vector.categories,
            vec![SkillCategory::CppSyntax, SkillCategory::Dsa]
        );
        assert_eq!(vocabulary.sentiment.correct[0], "understood");
    }

    #[test]
    fn test_yaml_keywords_are_normalized() {
        let yaml = r"
topics:
  - keyword: '  Graph '
    categories: [Graphs, DSA]
sentiment:
  correct: [Makes Sense]
";
        let vocabulary = Vocabulary::from_yaml(yaml).unwrap();
        assert_eq!(vocabulary.topics.len(), 1);
        assert_eq!(vocabulary.topics[0].keyword, "graph");
        assert_eq!(
            vocabulary.topics[0].categories,
            vec![SkillCategory::Other("Graphs".to_string()), SkillCategory::Dsa]
        );
        assert_eq!(vocabulary.sentiment.correct, vec!["makes sense"]);
        // Missing confusion list falls back to the defaults
        assert_eq!(vocabulary.sentiment.confusion, default_confusion());
    }

    #[test]
    fn test_yaml_without_topics_uses_defaults() {
        let vocabulary = Vocabulary::from_yaml("sentiment:\n  correct: [nice]\n").unwrap();
        assert_eq!(vocabulary.topics, default_topics());
    }

    #[test]
    fn test_blank_keyword_is_rejected() {
        let yaml = "topics:\n  - keyword: '   '\n    categories: [DSA]\n";
        let err = Vocabulary::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MentorError>(),
            Some(MentorError::Vocabulary(_))
        ));
    }

    #[test]
    fn test_misspelled_section_is_rejected() {
        let yaml = "topic:\n  - keyword: heap\n    categories: [DSA]\n";
        assert!(Vocabulary::from_yaml(yaml).is_err());

        let yaml = "topics:\n  - keyword: heap\n    category: [DSA]\n";
        assert!(Vocabulary::from_yaml(yaml).is_err());

        let yaml = "sentiment:\n  confused: [lost]\n";
        assert!(Vocabulary::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_keyword_without_categories_is_rejected() {
        let yaml = "topics:\n  - keyword: heap\n    categories: []\n";
        assert!(Vocabulary::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.yaml");
        fs::write(
            &path,
            "topics:\n  - keyword: trie\n    categories: [DSA]\n",
        )
        .unwrap();

        let vocabulary = Vocabulary::load_or_default(Some(&path)).unwrap();
        assert_eq!(vocabulary.topics[0].keyword, "trie");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        assert!(Vocabulary::load_or_default(Some(&path)).is_err());
    }
}
