use crate::config::{Config, StorageBackend};
use crate::console::{render_skills, spawn_line_reader, Command, HELP};
use anyhow::Result;
use mentor_persistence::{
    ContextStore, JsonFileContextStore, MemoryContextStore, SqliteContextStore,
};
use mentor_provider::{Provider, ProviderService};
use mentor_skills::Vocabulary;
use mentor_tutor::TutorService;
use mentor_types::{ChatMessage, Feedback, Role, UserId};
use std::io::Write;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Messages of conversation history sent with each turn
const RECENT_MESSAGES: usize = 20;

/// Gateway service - main orchestrator
pub struct GatewayService {
    config: Config,
}

impl GatewayService {
    /// Create a new gateway service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn build_store(&self) -> Result<Arc<dyn ContextStore>> {
        let storage = &self.config.storage;
        let store: Arc<dyn ContextStore> = match storage.backend {
            StorageBackend::Sqlite => Arc::new(SqliteContextStore::new(&storage.path).await?),
            StorageBackend::Json => Arc::new(JsonFileContextStore::new(&storage.path)),
            StorageBackend::Memory => {
                warn!("Memory storage selected, skill progress is lost on exit");
                Arc::new(MemoryContextStore::new())
            }
        };
        info!(backend = ?storage.backend, path = %storage.path, "Context store initialized");
        Ok(store)
    }

    fn build_provider(&self) -> Provider {
        let providers = &self.config.providers;
        match providers.default.as_str() {
            "openai" => Provider::openai(
                &providers.openai.model,
                providers.openai.api_key.as_deref(),
                providers.openai.base_url.as_deref(),
            ),
            "ollama" => Provider::ollama(&providers.ollama.model, &providers.ollama.base_url),
            other => {
                warn!("Unknown provider '{}', defaulting to OpenAI", other);
                Provider::default()
            }
        }
    }

    /// Run the gateway service
    pub async fn run(self) -> Result<()> {
        mentor_logging::init_logging(&self.config.logging.level, self.config.logging.json)?;
        info!("Starting Adaptive Mentor gateway");

        let store = self.build_store().await?;
        let provider = ProviderService::new(self.build_provider());
        let vocabulary = Vocabulary::load_or_default(self.config.tutor.vocabulary_path().as_deref())?;

        let tutor = TutorService::new(store, Arc::new(provider))
            .with_vocabulary(&vocabulary)
            .with_write_discipline(self.config.tutor.write_discipline);
        let user = UserId::new(self.config.tutor.user.as_str());
        info!(
            user = %user,
            discipline = ?tutor.write_discipline(),
            "Tutor initialized"
        );

        // Setup signal handler for graceful shutdown
        let shutdown = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
            info!("Received shutdown signal");
        };

        tokio::select! {
            result = run_console(&tutor, &user) => {
                if let Err(e) = result {
                    error!("Console error: {}", e);
                }
            }
            _ = shutdown => {
                info!("Shutting down gracefully...");
            }
        }

        info!("Gateway service stopped");
        Ok(())
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn run_console(tutor: &TutorService, user: &UserId) -> Result<()> {
    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;
    let mut history: Vec<ChatMessage> = Vec::new();

    println!("Adaptive Programming Mentor. Type /help for commands.");
    prompt()?;

    while let Some(line) = lines.recv().await {
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Unknown(name) => println!("Unknown command /{}. Type /help.", name),
            Command::Skills => print!("{}", render_skills(&tutor.context(user).await)),
            Command::Stats => match tutor.stats(user).await {
                Some(stats) => println!("{}", stats),
                None => println!("No skills tracked yet."),
            },
            Command::Feedback(action) => {
                let Some(last) = history.iter().rev().find(|m| m.role == Role::Assistant) else {
                    println!("Nothing to give feedback on yet.");
                    prompt()?;
                    continue;
                };
                let feedback = Feedback::new(action.as_str(), last.content.as_str());
                match tutor.submit_feedback(user, &feedback).await {
                    Ok(outcome) if outcome.updated_skills.is_empty() => {
                        println!("Noted, but no tracked skill matched that reply.");
                    }
                    Ok(outcome) => println!("Updated: {}", outcome.updated_skills.join(", ")),
                    Err(e) => {
                        error!("Feedback failed: {:#}", e);
                        println!("Could not record feedback: {}", e);
                    }
                }
            }
            Command::Chat(text) => {
                let start = history.len().saturating_sub(RECENT_MESSAGES);
                match tutor.handle_turn(user, &history[start..], &text).await {
                    Ok(outcome) => {
                        println!("{}", outcome.reply);
                        history.push(ChatMessage::user(text));
                        history.push(ChatMessage::assistant(outcome.reply));
                    }
                    Err(e) => {
                        error!("Turn failed: {:#}", e);
                        println!("Sorry, I could not reach the model: {}", e);
                    }
                }
            }
        }
        prompt()?;
    }

    Ok(())
}
