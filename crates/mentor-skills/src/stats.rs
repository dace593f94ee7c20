//! Aggregate read-side statistics over a skill context

use chrono::{DateTime, Utc};
use mentor_types::{SkillNode, UserSkillContext};
use serde::Serialize;
use std::fmt;

/// Overall standing derived from average mastery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rank {
    /// Average mastery up to 0.4
    Beginner,
    /// Average mastery above 0.4 up to 0.7
    Intermediate,
    /// Average mastery above 0.7
    Advanced,
}

impl Rank {
    /// Classify an average mastery
    pub fn from_average(average: f64) -> Self {
        if average > 0.7 {
            Rank::Advanced
        } else if average > 0.4 {
            Rank::Intermediate
        } else {
            Rank::Beginner
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Beginner => "Beginner",
            Rank::Intermediate => "Intermediate",
            Rank::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// Summary numbers for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStats {
    /// Mean mastery across all skills, in `[0, 1]`
    pub average_mastery: f64,
    /// Sum of history lengths across all skills
    pub total_updates: usize,
    /// Name of the highest-mastery skill
    pub top_skill: String,
    /// Most recent `last_updated` of any skill
    pub last_active: DateTime<Utc>,
    /// Rank derived from `average_mastery`
    pub rank: Rank,
    /// Number of archived thread summaries
    pub thread_count: usize,
}

impl SkillStats {
    /// Compute stats; `None` when the context has no skills
    pub fn from_context(context: &UserSkillContext) -> Option<Self> {
        let skills: Vec<&SkillNode> = context.skills.values().collect();
        let first = *skills.first()?;

        #[allow(clippy::cast_precision_loss)]
        let average_mastery =
            skills.iter().map(|s| s.mastery_probability).sum::<f64>() / skills.len() as f64;

        // Strict comparison keeps the lowest id on ties
        let top = skills.iter().copied().fold(first, |best, s| {
            if s.mastery_probability > best.mastery_probability {
                s
            } else {
                best
            }
        });

        let last_active = skills
            .iter()
            .map(|s| s.last_updated)
            .max()
            .unwrap_or(first.last_updated);

        Some(Self {
            average_mastery,
            total_updates: context.history_len(),
            top_skill: top.name.clone(),
            last_active,
            rank: Rank::from_average(average_mastery),
            thread_count: context.thread_summaries.len(),
        })
    }
}

impl fmt::Display for SkillStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rank: {}, avg. mastery {:.1}%, {} updates, strongest: {}, {} archived threads, last active {}",
            self.rank,
            self.average_mastery * 100.0,
            self.total_updates,
            self.top_skill,
            self.thread_count,
            self.last_active.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::seed::initialize_context;
    use crate::update::update_skill;
    use chrono::Duration;
    use mentor_types::{SkillAction, SkillCategory, UserId};

    #[test]
    fn test_empty_context_has_no_stats() {
        let context = UserSkillContext::new(UserId::default());
        assert!(SkillStats::from_context(&context).is_none());
    }

    #[test]
    fn test_seed_stats() {
        let now = Utc::now();
        let context = initialize_context(now);
        let stats = SkillStats::from_context(&context).unwrap();

        assert!((stats.average_mastery - 0.8 / 3.0).abs() < 1e-9);
        assert_eq!(stats.total_updates, 0);
        assert_eq!(stats.top_skill, "C++ Syntax");
        assert_eq!(stats.last_active, now);
        assert_eq!(stats.rank, Rank::Beginner);
        assert_eq!(stats.thread_count, 0);
    }

    #[test]
    fn test_stats_track_updates() {
        let seeded = Utc::now() - Duration::days(2);
        let mut context = initialize_context(seeded);

        let later = Utc::now();
        let dp = context.skill("dsa-dp").unwrap().clone();
        context.insert_skill(update_skill(&dp, SkillAction::Correct, "ok", later));

        let stats = SkillStats::from_context(&context).unwrap();
        assert_eq!(stats.total_updates, 1);
        assert_eq!(stats.last_active, later);
    }

    #[test]
    fn test_top_skill_tie_keeps_lowest_id() {
        let now = Utc::now();
        let mut context = UserSkillContext::new(UserId::default());
        context.insert_skill(SkillNode::new("b", "Second", SkillCategory::Dsa, 0.9, 0.5, now));
        context.insert_skill(SkillNode::new("a", "First", SkillCategory::Dp, 0.9, 0.5, now));

        let stats = SkillStats::from_context(&context).unwrap();
        assert_eq!(stats.top_skill, "First");
        assert_eq!(stats.rank, Rank::Advanced);
    }

    #[test]
    fn test_rank_bands() {
        assert_eq!(Rank::from_average(0.4), Rank::Beginner);
        assert_eq!(Rank::from_average(0.41), Rank::Intermediate);
        assert_eq!(Rank::from_average(0.7), Rank::Intermediate);
        assert_eq!(Rank::from_average(0.71), Rank::Advanced);
    }
}
