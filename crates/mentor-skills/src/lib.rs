//! Mentor skill-state engine
//!
//! Keeps a per-learner model of programming-skill proficiency and projects it
//! into instructions for a tutoring language model.
//!
//! ## Pipeline
//!
//! - [`TopicDetector`]: message text to a set of [`SkillCategory`] via keyword containment
//! - [`SentimentClassifier`]: message text to an optional feedback signal
//! - [`update_skill`]: bounded mastery/confidence update with an appended history entry
//! - [`synthesize_persona`]: skill context to a calibration block for the system prompt
//!
//! Every function here is pure: timestamps are passed in and nothing touches
//! storage. Loading and saving the context is the caller's job.
//!
//! [`SkillCategory`]: mentor_types::SkillCategory

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod persona;
pub mod seed;
pub mod sentiment;
pub mod stats;
pub mod topics;
pub mod update;
pub mod vocabulary;

pub use persona::{synthesize_persona, SkillLevel, UNKNOWN_SKILL_FALLBACK};
pub use seed::{initialize_context, initialize_context_for};
pub use sentiment::{classify_sentiment, SentimentClassifier};
pub use stats::{Rank, SkillStats};
pub use topics::{detect_topics, TopicDetector};
pub use update::update_skill;
pub use vocabulary::{SentimentLexicon, TopicKeyword, Vocabulary};
