//! Mentor Types - Core types for the adaptive mentor
//!
//! This module defines the skill-state data model shared by every crate in the
//! workspace. The JSON layout produced by these types is the persisted record
//! format, so field names and category strings are part of the contract.

pub mod error;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use error::{MentorError, Result};

/// User id used when the caller does not supply one
pub const DEFAULT_USER_ID: &str = "default-user";

// ============================================================================
// Identity
// ============================================================================

/// Identifier of the learner owning a skill context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new(DEFAULT_USER_ID)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// Skill categories and actions
// ============================================================================

/// Topic label grouping related skills.
///
/// The known categories serialize to their display strings; anything else is
/// kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SkillCategory {
    Dsa,
    Dp,
    Recursion,
    SystemDesign,
    CppSyntax,
    ComplexityAnalysis,
    Other(String),
}

impl SkillCategory {
    pub fn as_str(&self) -> &str {
        match self {
            SkillCategory::Dsa => "DSA",
            SkillCategory::Dp => "DP",
            SkillCategory::Recursion => "Recursion",
            SkillCategory::SystemDesign => "System Design",
            SkillCategory::CppSyntax => "C++ Syntax",
            SkillCategory::ComplexityAnalysis => "Complexity Analysis",
            SkillCategory::Other(label) => label,
        }
    }
}

impl From<&str> for SkillCategory {
    fn from(label: &str) -> Self {
        match label {
            "DSA" => SkillCategory::Dsa,
            "DP" => SkillCategory::Dp,
            "Recursion" => SkillCategory::Recursion,
            "System Design" => SkillCategory::SystemDesign,
            "C++ Syntax" => SkillCategory::CppSyntax,
            "Complexity Analysis" => SkillCategory::ComplexityAnalysis,
            other => SkillCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for SkillCategory {
    fn from(label: String) -> Self {
        SkillCategory::from(label.as_str())
    }
}

impl From<SkillCategory> for String {
    fn from(category: SkillCategory) -> Self {
        match category {
            SkillCategory::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback signal applied to a skill by the update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillAction {
    /// The learner showed understanding
    Correct,
    /// The learner was confused
    Confusion,
    /// The learner keeps struggling; only lowers confidence
    Struggle,
}

impl SkillAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillAction::Correct => "correct",
            SkillAction::Confusion => "confusion",
            SkillAction::Struggle => "struggle",
        }
    }
}

impl FromStr for SkillAction {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "correct" => Ok(SkillAction::Correct),
            "confusion" => Ok(SkillAction::Confusion),
            "struggle" => Ok(SkillAction::Struggle),
            _ => Err(MentorError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for SkillAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Skill state
// ============================================================================

/// One applied change to a skill's mastery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    /// Signed delta applied to `mastery_probability`
    pub change: f64,
    pub reason: String,
}

/// One tracked skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    /// Estimate of how well the learner knows the skill, in `[0, 1]`
    pub mastery_probability: f64,
    /// Certainty in the mastery estimate, in `[0, 1]`
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl SkillNode {
    /// Create a node with empty history. Mastery and confidence are clamped to `[0, 1]`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: SkillCategory,
        mastery_probability: f64,
        confidence: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            mastery_probability: mastery_probability.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            last_updated: now,
            history: Vec::new(),
        }
    }

    /// A skill matches a topic by category, or by a display name equal to the topic label.
    pub fn matches_topic(&self, topic: &SkillCategory) -> bool {
        self.category == *topic || self.name == topic.as_str()
    }
}

/// Archived conversation summary. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub domain: String,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

/// The full per-user skill record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkillContext {
    pub id: UserId,
    pub skills: BTreeMap<String, SkillNode>,
    #[serde(default)]
    pub thread_summaries: Vec<ThreadSummary>,
}

impl UserSkillContext {
    /// Create an empty context for a user
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            skills: BTreeMap::new(),
            thread_summaries: Vec::new(),
        }
    }

    /// Insert a skill keyed by its id
    pub fn insert_skill(&mut self, skill: SkillNode) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn skill(&self, id: &str) -> Option<&SkillNode> {
        self.skills.get(id)
    }

    /// Total number of history entries across all skills
    pub fn history_len(&self) -> usize {
        self.skills.values().map(|s| s.history.len()).sum()
    }
}

// ============================================================================
// Chat Types
// ============================================================================

/// Chat role for messages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message exchanged with the language model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Out-of-band feedback on a past message (e.g. a thumbs-up)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// `correct`, `confusion` or `struggle`
    #[serde(rename = "type")]
    pub kind: String,
    /// Text of the message the feedback refers to
    #[serde(rename = "contextText")]
    pub context_text: String,
}

impl Feedback {
    pub fn new(kind: impl Into<String>, context_text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            context_text: context_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_strings_round_trip() {
        for label in [
            "DSA",
            "DP",
            "Recursion",
            "System Design",
            "C++ Syntax",
            "Complexity Analysis",
        ] {
            let category = SkillCategory::from(label);
            assert!(!matches!(category, SkillCategory::Other(_)));
            assert_eq!(String::from(category), label);
        }

        let custom = SkillCategory::from("Graphs");
        assert_eq!(custom, SkillCategory::Other("Graphs".to_string()));
        assert_eq!(custom.as_str(), "Graphs");
    }

    #[test]
    fn test_category_serializes_as_display_string() {
        let json = serde_json::to_string(&SkillCategory::CppSyntax).unwrap();
        assert_eq!(json, "\"C++ Syntax\"");

        let parsed: SkillCategory = serde_json::from_str("\"System Design\"").unwrap();
        assert_eq!(parsed, SkillCategory::SystemDesign);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("correct".parse::<SkillAction>().unwrap(), SkillAction::Correct);
        assert_eq!(" Confusion ".parse::<SkillAction>().unwrap(), SkillAction::Confusion);
        assert_eq!("struggle".parse::<SkillAction>().unwrap(), SkillAction::Struggle);

        let err = "thumbs-up".parse::<SkillAction>().unwrap_err();
        assert!(matches!(err, MentorError::InvalidAction(ref s) if s == "thumbs-up"));
    }

    #[test]
    fn test_node_constructor_clamps() {
        let node = SkillNode::new("x", "X", SkillCategory::Dsa, 1.7, -0.2, Utc::now());
        assert_eq!(node.mastery_probability, 1.0);
        assert_eq!(node.confidence, 0.0);
        assert!(node.history.is_empty());
    }

    #[test]
    fn test_matches_topic_by_category_or_name() {
        let now = Utc::now();
        let by_category = SkillNode::new("a", "Memoization", SkillCategory::Dp, 0.1, 0.1, now);
        assert!(by_category.matches_topic(&SkillCategory::Dp));
        assert!(!by_category.matches_topic(&SkillCategory::Dsa));

        let by_name = SkillNode::new("b", "DSA", SkillCategory::from("Basics"), 0.1, 0.1, now);
        assert!(by_name.matches_topic(&SkillCategory::Dsa));
    }

    #[test]
    fn test_camel_case_record_deserializes() {
        let json = r#"{
            "id": "default-user",
            "skills": {
                "dsa-dp": {
                    "id": "dsa-dp",
                    "name": "Dynamic Programming",
                    "category": "DP",
                    "masteryProbability": 0.1,
                    "confidence": 0.4,
                    "lastUpdated": "2025-01-02T03:04:05.678Z",
                    "history": [
                        {"timestamp": "2025-01-02T03:04:05.678Z", "change": 0.05, "reason": "Implicit user feedback"}
                    ]
                }
            },
            "threadSummaries": []
        }"#;

        let context: UserSkillContext = serde_json::from_str(json).unwrap();
        assert_eq!(context.id, UserId::default());
        let dp = context.skill("dsa-dp").unwrap();
        assert_eq!(dp.category, SkillCategory::Dp);
        assert_eq!(dp.history.len(), 1);

        let value = serde_json::to_value(&context).unwrap();
        assert!(value["skills"]["dsa-dp"].get("masteryProbability").is_some());
        assert!(value.get("threadSummaries").is_some());
    }

    #[test]
    fn test_feedback_wire_names() {
        let feedback: Feedback =
            serde_json::from_str(r#"{"type": "correct", "contextText": "recursion"}"#).unwrap();
        assert_eq!(feedback.kind, "correct");
        assert_eq!(feedback.context_text, "recursion");
    }
}
