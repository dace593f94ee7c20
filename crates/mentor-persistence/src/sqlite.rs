use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use mentor_types::{UserId, UserSkillContext};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::{decode, encode, ContextStore};

/// Skill contexts stored in SQLite, one JSON document per user
pub struct SqliteContextStore {
    pool: SqlitePool,
}

impl SqliteContextStore {
    /// Open (or create) the database and run migrations
    pub async fn new(database_path: &str) -> Result<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = SqlitePool::connect(&database_url)
            .await
            .with_context(|| format!("Failed to open database {}", database_path))?;

        let store = Self { pool };
        store.run_migrations().await?;

        info!("Context store initialized with database: {}", database_path);
        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS skill_contexts (
                user_id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl ContextStore for SqliteContextStore {
    async fn load(&self, user: &UserId) -> Result<Option<UserSkillContext>> {
        let row = sqlx::query("SELECT document FROM skill_contexts WHERE user_id = ?")
            .bind(user.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let document: String = row.get("document");
                let context = decode(user, &document)
                    .with_context(|| format!("Corrupt context record for {}", user))?;
                Ok(Some(context))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, context: &UserSkillContext) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO skill_contexts (user_id, document, updated_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(context.id.as_str())
        .bind(encode(context)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_skills::{initialize_context_for, update_skill};
    use mentor_types::SkillAction;

    async fn open(dir: &tempfile::TempDir) -> SqliteContextStore {
        let path = dir.path().join("mentor.db");
        SqliteContextStore::new(path.to_str().unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_record_yields_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;

        let user = UserId::new("nobody");
        assert!(store.load(&user).await.unwrap().is_none());

        let context = store.get(&user).await;
        assert_eq!(context.id, user);
        assert_eq!(context.skills.len(), 3);
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;

        let user = UserId::new("alice");
        let mut context = initialize_context_for(user.clone(), Utc::now());
        let recursion = context.skill("dsa-recursion").unwrap().clone();
        context.insert_skill(update_skill(&recursion, SkillAction::Correct, "ok", Utc::now()));

        store.put(&context).await.unwrap();
        let loaded = store.get(&user).await;

        assert_eq!(loaded.id, context.id);
        assert_eq!(loaded.history_len(), 1);
        let stored = loaded.skill("dsa-recursion").unwrap();
        assert!((stored.mastery_probability - 0.25).abs() < 1e-9);
        assert_eq!(stored.history[0].reason, "ok");
    }

    #[tokio::test]
    async fn test_row_holding_another_users_context_yields_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;

        let intruder = initialize_context_for(UserId::new("mallory"), Utc::now());
        sqlx::query("INSERT INTO skill_contexts (user_id, document, updated_at) VALUES (?, ?, ?)")
            .bind("bob")
            .bind(encode(&intruder).unwrap())
            .bind(Utc::now().to_rfc3339())
            .execute(&store.pool)
            .await
            .unwrap();

        let user = UserId::new("bob");
        assert!(store.load(&user).await.is_err());
        assert_eq!(store.get(&user).await.id, user);
    }

    #[tokio::test]
    async fn test_corrupt_record_yields_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;

        sqlx::query("INSERT INTO skill_contexts (user_id, document, updated_at) VALUES (?, ?, ?)")
            .bind("bob")
            .bind("{not json")
            .bind(Utc::now().to_rfc3339())
            .execute(&store.pool)
            .await
            .unwrap();

        let user = UserId::new("bob");
        assert!(store.load(&user).await.is_err());

        let context = store.get(&user).await;
        assert_eq!(context.skills.len(), 3);
        assert_eq!(context.history_len(), 0);
    }
}
