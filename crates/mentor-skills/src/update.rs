//! Bounded mastery/confidence update rule

use chrono::{DateTime, Utc};
use mentor_types::{HistoryEntry, SkillAction, SkillNode};

/// Mastery gained on a `correct` signal
pub const MASTERY_INCREMENT: f64 = 0.05;
/// Mastery lost on a `confusion` signal
pub const MASTERY_DECREMENT: f64 = 0.03;
/// Confidence gained on a `correct` signal
pub const CONFIDENCE_BOOST: f64 = 0.02;
/// Confidence lost on a `confusion` signal
pub const CONFIDENCE_DROP_ON_CONFUSION: f64 = 0.01;
/// Confidence lost on a `struggle` signal
pub const CONFIDENCE_DROP_ON_STRUGGLE: f64 = 0.10;

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Apply one feedback signal to a skill and return the updated node.
///
/// The input node is left untouched. The returned node has `last_updated = now`
/// and exactly one new history entry whose `change` is the mastery delta that
/// was actually applied after clamping (always zero for `struggle`).
pub fn update_skill(
    node: &SkillNode,
    action: SkillAction,
    reason: impl Into<String>,
    now: DateTime<Utc>,
) -> SkillNode {
    let old_mastery = node.mastery_probability;

    let (mastery, confidence) = match action {
        SkillAction::Correct => (
            clamp_unit(old_mastery + MASTERY_INCREMENT),
            clamp_unit(node.confidence + CONFIDENCE_BOOST),
        ),
        SkillAction::Confusion => (
            clamp_unit(old_mastery - MASTERY_DECREMENT),
            clamp_unit(node.confidence - CONFIDENCE_DROP_ON_CONFUSION),
        ),
        SkillAction::Struggle => (
            old_mastery,
            clamp_unit(node.confidence - CONFIDENCE_DROP_ON_STRUGGLE),
        ),
    };

    let mut updated = node.clone();
    updated.mastery_probability = mastery;
    updated.confidence = confidence;
    updated.last_updated = now;
    updated.history.push(HistoryEntry {
        timestamp: now,
        change: mastery - old_mastery,
        reason: reason.into(),
    });

    updated
}
