//! Mentor conversation orchestrator
//!
//! Wires the skill-state engine to a context store and a completion provider.
//! All I/O and clock reads happen here; the engine functions stay pure.

mod locks;
pub mod prompt;

pub use locks::WriteDiscipline;
pub use prompt::build_system_prompt;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mentor_persistence::ContextStore;
use mentor_provider::CompletionProvider;
use mentor_skills::{
    synthesize_persona, update_skill, SentimentClassifier, SkillStats, TopicDetector, Vocabulary,
};
use mentor_types::{
    ChatMessage, Feedback, MentorError, SkillAction, SkillCategory, UserId, UserSkillContext,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use locks::{UserGuard, UserLocks};

/// History reason for updates inferred from chat text
pub const IMPLICIT_FEEDBACK_REASON: &str = "Implicit user feedback";
/// History reason for out-of-band feedback
pub const EXPLICIT_FEEDBACK_REASON: &str = "Explicit user feedback on message";

/// Result of one chat turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub topics: BTreeSet<SkillCategory>,
    pub sentiment: Option<SkillAction>,
    /// Ids of skills updated (and persisted) by this turn
    pub updated_skills: Vec<String>,
    /// Full system instruction sent to the model
    pub system_prompt: String,
}

/// Result of an explicit feedback submission
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    pub updated_topics: BTreeSet<SkillCategory>,
    pub updated_skills: Vec<String>,
}

/// Apply `action` to every skill matching one of `topics`.
///
/// A skill matching several topics is updated once. Returns the keys of the
/// updated skills, in key order.
pub fn apply_to_matching(
    context: &mut UserSkillContext,
    topics: &BTreeSet<SkillCategory>,
    action: SkillAction,
    reason: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut updated = Vec::new();

    for (key, skill) in context.skills.iter_mut() {
        if topics.iter().any(|topic| skill.matches_topic(topic)) {
            *skill = update_skill(skill, action, reason, now);
            updated.push(key.clone());
        }
    }

    updated
}

/// Tutor service - per-turn orchestration of the skill-state engine
pub struct TutorService {
    store: Arc<dyn ContextStore>,
    provider: Arc<dyn CompletionProvider>,
    detector: TopicDetector,
    classifier: SentimentClassifier,
    discipline: WriteDiscipline,
    locks: UserLocks,
}

impl TutorService {
    /// Create a tutor with the built-in vocabulary and serialized writes
    pub fn new(store: Arc<dyn ContextStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            store,
            provider,
            detector: TopicDetector::default(),
            classifier: SentimentClassifier::default(),
            discipline: WriteDiscipline::default(),
            locks: UserLocks::default(),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: &Vocabulary) -> Self {
        self.detector = TopicDetector::new(vocabulary);
        self.classifier = SentimentClassifier::new(vocabulary);
        self
    }

    pub fn with_write_discipline(mut self, discipline: WriteDiscipline) -> Self {
        self.discipline = discipline;
        self
    }

    pub fn write_discipline(&self) -> WriteDiscipline {
        self.discipline
    }

    async fn write_guard(&self, user: &UserId) -> Option<UserGuard> {
        match self.discipline {
            WriteDiscipline::Serialized => Some(self.locks.acquire(user).await),
            WriteDiscipline::BestEffort => None,
        }
    }

    /// Process one inbound chat message.
    ///
    /// Skills are updated only when the text carries both a sentiment signal
    /// and at least one topic. The persona is built from the context as it is
    /// after that update.
    pub async fn handle_turn(
        &self,
        user: &UserId,
        history: &[ChatMessage],
        text: &str,
    ) -> Result<TurnOutcome> {
        let topics = self.detector.detect(text);
        let sentiment = self.classifier.classify(text);
        debug!(
            "Turn for {}: topics={:?}, sentiment={:?}",
            user, topics, sentiment
        );

        let (context, updated_skills) = {
            let _guard = self.write_guard(user).await;
            let mut context = self.store.get(user).await;

            let updated = match sentiment {
                Some(action) if !topics.is_empty() => {
                    let updated = apply_to_matching(
                        &mut context,
                        &topics,
                        action,
                        IMPLICIT_FEEDBACK_REASON,
                        Utc::now(),
                    );
                    self.store
                        .put(&context)
                        .await
                        .with_context(|| format!("Failed to save context for {}", user))?;
                    updated
                }
                _ => Vec::new(),
            };

            (context, updated)
        };

        if !updated_skills.is_empty() {
            info!(
                "Updated {} skill(s) for {} from chat: {:?}",
                updated_skills.len(),
                user,
                updated_skills
            );
        }

        let persona = synthesize_persona(&context, &topics);
        let system_prompt = build_system_prompt(&persona);

        let reply = self
            .provider
            .complete(&system_prompt, history, text)
            .await
            .context("Failed to get mentor response")?;

        Ok(TurnOutcome {
            reply,
            topics,
            sentiment,
            updated_skills,
            system_prompt,
        })
    }

    /// Apply out-of-band feedback about a specific message.
    ///
    /// Unknown feedback kinds fail with [`MentorError::InvalidAction`]. Nothing
    /// is written when the message text has no topic.
    pub async fn submit_feedback(&self, user: &UserId, feedback: &Feedback) -> Result<FeedbackOutcome> {
        let action: SkillAction = feedback.kind.parse()?;
        if feedback.context_text.trim().is_empty() {
            return Err(MentorError::MissingField("contextText").into());
        }

        let topics = self.detector.detect(&feedback.context_text);
        if topics.is_empty() {
            debug!("Feedback for {} carried no topic, nothing to update", user);
            return Ok(FeedbackOutcome {
                updated_topics: topics,
                updated_skills: Vec::new(),
            });
        }

        let _guard = self.write_guard(user).await;
        let mut context = self.store.get(user).await;
        let updated_skills = apply_to_matching(
            &mut context,
            &topics,
            action,
            EXPLICIT_FEEDBACK_REASON,
            Utc::now(),
        );
        self.store
            .put(&context)
            .await
            .with_context(|| format!("Failed to save context for {}", user))?;

        info!(
            "Applied {} feedback for {} to {:?}",
            action, user, updated_skills
        );
        Ok(FeedbackOutcome {
            updated_topics: topics,
            updated_skills,
        })
    }

    /// Current context for display. Never mutates the store.
    pub async fn context(&self, user: &UserId) -> UserSkillContext {
        self.store.get(user).await
    }

    /// Aggregate stats for display
    pub async fn stats(&self, user: &UserId) -> Option<SkillStats> {
        SkillStats::from_context(&self.context(user).await)
    }
}
