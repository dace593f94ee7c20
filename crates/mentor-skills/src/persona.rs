//! Persona synthesis: skill state rendered as tutoring instructions

use mentor_types::{SkillCategory, SkillNode, UserSkillContext};
use std::collections::BTreeSet;
use std::fmt;

/// Returned when none of the learner's skills are relevant to the message
pub const UNKNOWN_SKILL_FALLBACK: &str =
    "User skill level is unknown. Assume beginner level and explain concepts clearly.";

const TEACHING_STRATEGY: &str = "Teaching Strategy:
- For low mastery skills (< 0.5), provide step-by-step explanations and analogies.
- For intermediate skills (0.5 - 0.8), focus on structured explanations and best practices.
- For high mastery skills (> 0.8), be concise, discuss trade-offs, and edge cases.
- If confidence is low, verify understanding frequently.";

/// Descriptive level derived from mastery probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLevel {
    /// Mastery up to 0.5
    Beginner,
    /// Mastery above 0.5 up to 0.8
    Intermediate,
    /// Mastery above 0.8
    Expert,
}

impl SkillLevel {
    /// Classify a mastery probability
    pub fn from_mastery(mastery: f64) -> Self {
        if mastery > 0.8 {
            SkillLevel::Expert
        } else if mastery > 0.5 {
            SkillLevel::Intermediate
        } else {
            SkillLevel::Beginner
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        };
        f.write_str(label)
    }
}

fn skill_line(skill: &SkillNode) -> String {
    format!(
        "- {}: {} (Mastery: {:.2}, Confidence: {:.2})",
        skill.name,
        SkillLevel::from_mastery(skill.mastery_probability),
        skill.mastery_probability,
        skill.confidence
    )
}

/// Render the calibration block for the skills in `relevant` categories.
///
/// Skill lines follow skill-id order. With no relevant skill the fixed
/// beginner fallback is returned.
pub fn synthesize_persona(
    context: &UserSkillContext,
    relevant: &BTreeSet<SkillCategory>,
) -> String {
    let lines: Vec<String> = context
        .skills
        .values()
        .filter(|skill| relevant.contains(&skill.category))
        .map(skill_line)
        .collect();

    if lines.is_empty() {
        return UNKNOWN_SKILL_FALLBACK.to_string();
    }

    format!(
        "User Skill Context:\n{}\n\n{}\n",
        lines.join("\n"),
        TEACHING_STRATEGY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::initialize_context;
    use chrono::Utc;

    fn categories(list: &[SkillCategory]) -> BTreeSet<SkillCategory> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_fallback_without_relevant_categories() {
        let context = initialize_context(Utc::now());
        assert_eq!(
            synthesize_persona(&context, &BTreeSet::new()),
            UNKNOWN_SKILL_FALLBACK
        );

        let empty = UserSkillContext::new(context.id.clone());
        assert_eq!(
            synthesize_persona(&empty, &categories(&[SkillCategory::Dp])),
            UNKNOWN_SKILL_FALLBACK
        );
    }

    #[test]
    fn test_fallback_when_categories_have_no_skill() {
        let context = initialize_context(Utc::now());
        let persona = synthesize_persona(&context, &categories(&[SkillCategory::SystemDesign]));
        assert_eq!(persona, UNKNOWN_SKILL_FALLBACK);
    }

    #[test]
    fn test_renders_relevant_skills_only() {
        let context = initialize_context(Utc::now());
        let persona = synthesize_persona(
            &context,
            &categories(&[SkillCategory::Recursion, SkillCategory::Dsa]),
        );

        assert!(persona.starts_with("User Skill Context:\n"));
        assert!(persona.contains("- Recursion: beginner (Mastery: 0.20, Confidence: 0.50)"));
        assert!(!persona.contains("Dynamic Programming"));
        assert!(!persona.contains("C++ Syntax:"));
        assert!(persona.contains("Teaching Strategy:"));
        assert!(persona.contains("verify understanding frequently"));
    }

    #[test]
    fn test_lines_follow_skill_id_order() {
        let context = initialize_context(Utc::now());
        let persona = synthesize_persona(
            &context,
            &categories(&[SkillCategory::Dp, SkillCategory::CppSyntax]),
        );

        let cpp = persona.find("- C++ Syntax").unwrap_or(usize::MAX);
        let dp = persona.find("- Dynamic Programming").unwrap_or(usize::MAX);
        assert!(cpp < dp);
        assert!(persona.contains("- C++ Syntax: beginner (Mastery: 0.50, Confidence: 0.80)"));
    }

    #[test]
    fn test_renders_intermediate_and_expert_lines() {
        let now = Utc::now();
        let mut context = initialize_context(now);
        context.insert_skill(SkillNode::new(
            "dsa-recursion",
            "Recursion",
            SkillCategory::Recursion,
            0.65,
            0.7,
            now,
        ));
        context.insert_skill(SkillNode::new(
            "dsa-dp",
            "Dynamic Programming",
            SkillCategory::Dp,
            0.9,
            0.95,
            now,
        ));

        let persona = synthesize_persona(
            &context,
            &categories(&[SkillCategory::Recursion, SkillCategory::Dp]),
        );

        assert!(persona.contains("- Recursion: intermediate (Mastery: 0.65, Confidence: 0.70)"));
        assert!(persona.contains(
            "- Dynamic Programming: expert (Mastery: 0.90, Confidence: 0.95)"
        ));
        assert!(!persona.contains("beginner"));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(SkillLevel::from_mastery(0.0), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_mastery(0.5), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_mastery(0.51), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_mastery(0.8), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_mastery(0.81), SkillLevel::Expert);
    }
}
