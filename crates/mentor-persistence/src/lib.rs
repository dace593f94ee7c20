//! Storage for per-user skill contexts
//!
//! A store only has to load and save one JSON document per user. Missing or
//! unreadable records are never surfaced to callers of [`ContextStore::get`]:
//! the seed context is substituted instead.

mod file;
mod memory;
mod sqlite;

pub use file::JsonFileContextStore;
pub use memory::MemoryContextStore;
pub use sqlite::SqliteContextStore;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use mentor_skills::initialize_context_for;
use mentor_types::{UserId, UserSkillContext};
use tracing::{debug, warn};

/// Key-value contract for skill contexts, one record per user
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Read the stored record, `Ok(None)` when there is none
    async fn load(&self, user: &UserId) -> Result<Option<UserSkillContext>>;

    /// Write the record under `context.id`, replacing any previous one
    async fn put(&self, context: &UserSkillContext) -> Result<()>;

    /// Stored context for `user`, or the seed context when the record is
    /// missing or cannot be read
    async fn get(&self, user: &UserId) -> UserSkillContext {
        match self.load(user).await {
            Ok(Some(context)) => context,
            Ok(None) => {
                debug!("No stored context for {}, using seed", user);
                initialize_context_for(user.clone(), Utc::now())
            }
            Err(e) => {
                warn!("Failed to load context for {}, using seed: {:#}", user, e);
                initialize_context_for(user.clone(), Utc::now())
            }
        }
    }
}

/// Parse a stored JSON document, rejecting a record that belongs to another user
pub(crate) fn decode(user: &UserId, document: &str) -> Result<UserSkillContext> {
    let context: UserSkillContext = serde_json::from_str(document)?;
    if context.id != *user {
        bail!("record for {} holds the context of {}", user, context.id);
    }
    Ok(context)
}

/// Serialize a context as a pretty JSON document
pub(crate) fn encode(context: &UserSkillContext) -> Result<String> {
    Ok(serde_json::to_string_pretty(context)?)
}
