use anyhow::{Context, Result};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use mentor_types::{ChatMessage, Role};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Reply used when the model returns no choices
const EMPTY_REPLY: &str = "I couldn't generate a response.";

/// LLM Provider configuration
#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    OpenAI {
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
    },
    Ollama {
        model: String,
        base_url: String,
    },
}

impl Default for Provider {
    fn default() -> Self {
        Provider::openai("gpt-4o-mini", None, None)
    }
}

impl Provider {
    /// OpenAI (or any OpenAI-compatible endpoint). Empty strings count as unset.
    pub fn openai(model: &str, api_key: Option<&str>, base_url: Option<&str>) -> Self {
        Provider::OpenAI {
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            base_url: base_url.filter(|u| !u.is_empty()).map(str::to_string),
        }
    }

    pub fn ollama(model: &str, base_url: &str) -> Self {
        Provider::Ollama {
            model: model.to_string(),
            base_url: base_url.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}

/// Something that turns a system prompt and a conversation into a reply
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// `history` holds earlier turns; `prompt` is the latest user message
    async fn complete(&self, system: &str, history: &[ChatMessage], prompt: &str)
        -> Result<String>;
}

/// Provider service for interacting with LLM providers
pub struct ProviderService {
    provider: Provider,
    client: Client<OpenAIConfig>,
}

impl ProviderService {
    /// Create a new provider service
    pub fn new(provider: Provider) -> Self {
        let config = match &provider {
            Provider::OpenAI {
                api_key, base_url, ..
            } => {
                let mut config = OpenAIConfig::new();
                if let Some(key) = api_key {
                    config = config.with_api_key(key);
                }
                if let Some(url) = base_url {
                    config = config.with_api_base(url);
                }
                config
            }
            Provider::Ollama { base_url, .. } => OpenAIConfig::new().with_api_base(base_url),
        };

        info!("Provider service initialized with model: {}", provider.model());
        Self {
            provider,
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl CompletionProvider for ProviderService {
    async fn complete(
        &self,
        system: &str,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<String> {
        use async_openai::types::chat::{
            ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
            ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
            CreateChatCompletionRequestArgs,
        };

        // System prompt first, then the earlier turns, then the new message
        let mut chat_messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()?
                .into(),
        ];

        for msg in history {
            let message: ChatCompletionRequestMessage = match msg.role {
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content.clone())
                    .build()?
                    .into(),
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content.clone())
                    .build()?
                    .into(),
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content.clone())
                    .build()?
                    .into(),
            };
            chat_messages.push(message);
        }

        chat_messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.provider.model())
            .messages(chat_messages)
            .build()?;

        debug!(
            "Sending completion request: model={}, history={}",
            self.provider.model(),
            history.len()
        );
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .with_context(|| format!("Completion request to {} failed", self.provider.model()))?;

        if let Some(choice) = response.choices.first() {
            Ok(choice.message.content.clone().unwrap_or_default())
        } else {
            warn!("Provider returned no choices");
            Ok(EMPTY_REPLY.to_string())
        }
    }
}

/// Replays canned replies in order and records every request.
///
/// Used by tests and offline runs in place of a network provider.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// System prompts received so far
    pub fn system_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        system: &str,
        _history: &[ChatMessage],
        _prompt: &str,
    ) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(system.to_string());
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        Ok(reply.unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }
}
