//! Seed skill context for a new learner

use chrono::{DateTime, Utc};
use mentor_types::{SkillCategory, SkillNode, UserId, UserSkillContext};

/// Seed context for the default user
pub fn initialize_context(now: DateTime<Utc>) -> UserSkillContext {
    initialize_context_for(UserId::default(), now)
}

/// Seed context for `user`: three starting skills with beginner-leaning estimates
pub fn initialize_context_for(user: UserId, now: DateTime<Utc>) -> UserSkillContext {
    let mut context = UserSkillContext::new(user);

    context.insert_skill(SkillNode::new(
        "dsa-recursion",
        "Recursion",
        SkillCategory::Recursion,
        0.2,
        0.5,
        now,
    ));
    context.insert_skill(SkillNode::new(
        "dsa-dp",
        "Dynamic Programming",
        SkillCategory::Dp,
        0.1,
        0.4,
        now,
    ));
    context.insert_skill(SkillNode::new(
        "cpp-syntax",
        "C++ Syntax",
        SkillCategory::CppSyntax,
        0.5,
        0.8,
        now,
    ));

    context
}
