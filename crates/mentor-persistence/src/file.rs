use anyhow::{Context, Result};
use async_trait::async_trait;
use mentor_types::{UserId, UserSkillContext};
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::{decode, encode, ContextStore};

/// Skill contexts stored as pretty-printed JSON files, one per user
pub struct JsonFileContextStore {
    dir: PathBuf,
}

impl JsonFileContextStore {
    /// Store files under `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `user`'s record. Every byte outside `[A-Za-z0-9_-]`,
    /// `%` included, is written as `%XX`, so distinct ids map to distinct
    /// files and an id can never escape the store directory.
    pub fn path_for(&self, user: &UserId) -> PathBuf {
        let mut file_name = String::with_capacity(user.as_str().len());
        for byte in user.as_str().bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                file_name.push(char::from(byte));
            } else {
                let _ = write!(file_name, "%{:02X}", byte);
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl ContextStore for JsonFileContextStore {
    async fn load(&self, user: &UserId) -> Result<Option<UserSkillContext>> {
        let path = self.path_for(user);

        let document = match fs::read_to_string(&path).await {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
        };

        let context = decode(user, &document).with_context(|| format!("Corrupt context file {:?}", path))?;
        Ok(Some(context))
    }

    async fn put(&self, context: &UserSkillContext) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create directory {:?}", self.dir))?;

        let path = self.path_for(&context.id);
        fs::write(&path, encode(context)?)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;

        debug!("Saved context for {} to {:?}", context.id, path);
        Ok(())
    }
}
