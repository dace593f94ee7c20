use anyhow::anyhow;
use mentor_tutor::WriteDiscipline;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Written to ~/.mentor/mentor.toml on first run
const DEFAULT_CONFIG: &str = r#"
[providers]
default = "openai"  # or "ollama"

[providers.openai]
api_key = ""  # Set via OPENAI_API_KEY env var
model = "gpt-4o-mini"
base_url = ""  # Optional: Set via OPENAI_BASE_URL env var

[providers.ollama]
base_url = "http://localhost:11434/v1"
model = "llama3"

[storage]
backend = "sqlite"  # sqlite, json or memory
path = "mentor.db"  # database file, or directory for the json backend

[tutor]
user = "default-user"  # Set via MENTOR_USER env var
write_discipline = "serialized"  # or "best_effort"
vocabulary = ""  # Optional YAML keyword table; ~/.mentor/vocabulary.yaml is used if present

[logging]
level = "info"  # trace, debug, info, warn, error
json = false
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAIConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    pub default: String,
    pub openai: OpenAIConfig,
    pub ollama: OllamaConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Json,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TutorConfig {
    pub user: String,
    #[serde(default)]
    pub write_discipline: WriteDiscipline,
    #[serde(default)]
    pub vocabulary: Option<String>,
}

impl TutorConfig {
    /// Vocabulary path, treating an empty string as unset
    pub fn vocabulary_path(&self) -> Option<PathBuf> {
        self.vocabulary
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub storage: StorageConfig,
    pub tutor: TutorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.mentor/mentor.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".mentor").join("mentor.toml"))
            .ok_or_else(|| anyhow!("Could not find home directory"))
    }

    /// Create ~/.mentor/mentor.toml from the template when it is missing
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
            eprintln!("Please edit this file or set environment variables.");
        }

        Ok(config_path)
    }

    /// Layered load, later layers win: global file, optional ./mentor.toml,
    /// `MENTOR__SECTION__KEY` variables, then the well-known provider and user variables.
    pub fn load() -> anyhow::Result<Self> {
        // .env is optional
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("mentor").required(false))
            .add_source(config::Environment::with_prefix("MENTOR").separator("__"));

        for (var, key) in [
            ("OPENAI_API_KEY", "providers.openai.api_key"),
            ("OPENAI_BASE_URL", "providers.openai.base_url"),
            ("OLLAMA_BASE_URL", "providers.ollama.base_url"),
            ("MENTOR_USER", "tutor.user"),
        ] {
            if let Ok(value) = env::var(var) {
                config_builder = config_builder.set_override(key, value)?;
            }
        }

        Ok(config_builder.build()?.try_deserialize()?)
    }
}
