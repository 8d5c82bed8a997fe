use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::cli::Provider;

pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("model call failed: {0}")]
    Transport(String),
    #[error("model output does not match the {schema} schema: {reason}")]
    Parse {
        schema: &'static str,
        reason: String,
        raw: String,
    },
}

impl InvokeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Parse { .. } => "parse",
        }
    }

    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Transport(_) => None,
            Self::Parse { raw, .. } => Some(raw),
        }
    }
}

pub trait ModelInvoker {
    fn model_name(&self) -> &str;

    fn complete(&self, system: &str, prompt: &str) -> Result<String, InvokeError>;
}

impl Provider {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Together => "https://api.together.xyz/v1",
            Self::Venice => "https://api.venice.ai/api/v1",
            Self::Nebius => "https://api.studio.nebius.com/v1",
            Self::DeepInfra => "https://api.deepinfra.com/v1/openai",
        }
    }

    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Together => "TOGETHER_API_KEY",
            Self::Venice => "VENICE_API_KEY",
            Self::Nebius => "NEBIUS_API_KEY",
            Self::DeepInfra => "DEEPINFRA_API_KEY",
        }
    }

    fn api_key(self) -> Result<String> {
        let var = self.api_key_env();
        let key = std::env::var(var).unwrap_or_default();
        let key = key.trim().to_string();
        if key.is_empty() {
            bail!("{:?} provider requires {var} to be set", self);
        }
        Ok(key)
    }
}

pub enum ChatModel {
    Ollama {
        host: String,
        model: String,
        client: reqwest::blocking::Client,
    },
    OpenAiCompatible {
        provider: Provider,
        api_key: String,
        model: String,
        client: reqwest::blocking::Client,
    },
}

impl ChatModel {
    pub fn configure(remote: Option<Provider>, model: &str, ollama_host: &str) -> Result<Self> {
        // A hung call blocks the run; no client-side timeout.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;

        let model = model.to_string();
        Ok(match remote {
            None => Self::Ollama {
                host: normalize_ollama_host(ollama_host),
                model,
                client,
            },
            Some(provider) => Self::OpenAiCompatible {
                provider,
                api_key: provider.api_key()?,
                model,
                client,
            },
        })
    }
}

fn normalize_ollama_host(host: &str) -> String {
    let mut host = host.trim().to_string();
    if host.is_empty() {
        host = "http://127.0.0.1:11434".to_string();
    }
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{host}");
    }
    host.trim_end_matches('/').to_string()
}

fn chat_messages(system: &str, prompt: &str) -> serde_json::Value {
    json!([
        { "role": "system", "content": system },
        { "role": "user", "content": prompt }
    ])
}

impl ModelInvoker for ChatModel {
    fn model_name(&self) -> &str {
        match self {
            Self::Ollama { model, .. } | Self::OpenAiCompatible { model, .. } => model,
        }
    }

    fn complete(&self, system: &str, prompt: &str) -> Result<String, InvokeError> {
        match self {
            Self::Ollama {
                host,
                model,
                client,
            } => ollama_chat(client, host, model, system, prompt),
            Self::OpenAiCompatible {
                provider,
                api_key,
                model,
                client,
            } => openai_chat(client, *provider, api_key, model, system, prompt),
        }
    }
}

fn ollama_chat(
    client: &reqwest::blocking::Client,
    host: &str,
    model: &str,
    system: &str,
    prompt: &str,
) -> Result<String, InvokeError> {
    let url = format!("{host}/api/chat");
    let body = json!({
        "model": model,
        "stream": false,
        "format": "json",
        "messages": chat_messages(system, prompt),
        "options": { "temperature": 0 }
    });

    let resp = client.post(&url).json(&body).send().map_err(|e| {
        InvokeError::Transport(format!("failed to reach ollama at {url} (is it running?): {e}"))
    })?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        return Err(InvokeError::Transport(format!(
            "ollama http error {status}: {text}"
        )));
    }

    #[derive(Deserialize)]
    struct OllamaChatResponse {
        message: OllamaChatMessage,
    }

    #[derive(Deserialize)]
    struct OllamaChatMessage {
        content: String,
    }

    let out: OllamaChatResponse = resp
        .json()
        .map_err(|e| InvokeError::Transport(format!("ollama returned invalid JSON: {e}")))?;
    Ok(out.message.content)
}

fn openai_chat(
    client: &reqwest::blocking::Client,
    provider: Provider,
    api_key: &str,
    model: &str,
    system: &str,
    prompt: &str,
) -> Result<String, InvokeError> {
    let url = format!("{}/chat/completions", provider.base_url());
    let body = json!({
        "model": model,
        "messages": chat_messages(system, prompt),
        "temperature": 0
    });

    let resp = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .map_err(|e| {
            InvokeError::Transport(format!("failed to reach {provider:?} at {url}: {e}"))
        })?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        return Err(InvokeError::Transport(format!(
            "{provider:?} http error {status}: {text}"
        )));
    }

    let v: serde_json::Value = resp.json().map_err(|e| {
        InvokeError::Transport(format!("{provider:?} returned invalid JSON: {e}"))
    })?;
    v["choices"][0]["message"]["content"]
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            InvokeError::Transport(format!(
                "{provider:?}: no message content in response (unexpected response shape)"
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSchema {
    Definition,
    Scores,
}

impl OutputSchema {
    pub fn name(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Scores => "scores",
        }
    }

    fn json_schema(self) -> serde_json::Value {
        match self {
            Self::Definition => json!({
                "properties": {
                    "definition": {
                        "description": "Definizione del senso di una parola",
                        "title": "Definition",
                        "type": "string"
                    }
                },
                "required": ["definition"]
            }),
            Self::Scores => json!({
                "properties": {
                    "scores": {
                        "description": "La valutazione data alla definizione come punteggio da 1 a 10",
                        "items": { "type": "integer" },
                        "title": "Scores",
                        "type": "array"
                    }
                },
                "required": ["scores"]
            }),
        }
    }

    pub fn format_instructions(self) -> String {
        format!(
            "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\
             For the schema {{\"properties\": {{\"foo\": {{\"type\": \"string\"}}}}, \"required\": [\"foo\"]}} \
             the object {{\"foo\": \"bar\"}} is well formatted.\n\
             Here is the output schema:\n```\n{}\n```",
            self.json_schema()
        )
    }
}

pub trait Structured: DeserializeOwned {
    const SCHEMA: OutputSchema;

    fn check(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefinitionOutput {
    pub definition: String,
}

impl Structured for DefinitionOutput {
    const SCHEMA: OutputSchema = OutputSchema::Definition;

    fn check(&self) -> std::result::Result<(), String> {
        if self.definition.trim().is_empty() {
            return Err("definition is empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoresOutput {
    pub scores: Vec<u8>,
}

impl Structured for ScoresOutput {
    const SCHEMA: OutputSchema = OutputSchema::Scores;

    fn check(&self) -> std::result::Result<(), String> {
        match self.scores.iter().find(|score| !SCORE_RANGE.contains(*score)) {
            Some(score) => Err(format!("score {score} outside 1..=10")),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Completion<T> {
    pub value: T,
    pub raw: String,
}

pub struct OutputParser {
    json_object: Regex,
}

impl OutputParser {
    pub fn new() -> Result<Self> {
        let json_object =
            Regex::new(r"(?s)\{.*\}").context("failed to compile json object regex")?;
        Ok(Self { json_object })
    }

    pub fn parse<T: Structured>(&self, raw: &str) -> std::result::Result<T, InvokeError> {
        let schema = T::SCHEMA.name();
        let fail = |reason: String| InvokeError::Parse {
            schema,
            reason,
            raw: raw.to_string(),
        };

        let candidate = self
            .json_object
            .find(raw)
            .ok_or_else(|| fail("no JSON object in output".to_string()))?;
        let value: T = serde_json::from_str(candidate.as_str()).map_err(|e| fail(e.to_string()))?;
        value.check().map_err(fail)?;
        Ok(value)
    }

    pub fn invoke<T: Structured>(
        &self,
        invoker: &dyn ModelInvoker,
        system: &str,
        prompt: &str,
    ) -> std::result::Result<Completion<T>, InvokeError> {
        let full_prompt = format!("{}\n{prompt}", T::SCHEMA.format_instructions());
        let raw = invoker.complete(system, &full_prompt)?;
        debug!(model = %invoker.model_name(), schema = T::SCHEMA.name(), "model replied");
        let value = self.parse::<T>(&raw)?;
        Ok(Completion { value, raw })
    }
}
