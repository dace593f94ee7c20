use anyhow::Result;
use async_trait::async_trait;
use mentor_types::{UserId, UserSkillContext};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::ContextStore;

/// Process-local store, for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryContextStore {
    records: RwLock<HashMap<UserId, UserSkillContext>>,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ContextStore for MemoryContextStore {
    async fn load(&self, user: &UserId) -> Result<Option<UserSkillContext>> {
        Ok(self.records.read().await.get(user).cloned())
    }

    async fn put(&self, context: &UserSkillContext) -> Result<()> {
        self.records
            .write()
            .await
            .insert(context.id.clone(), context.clone());
        Ok(())
    }
}
