/// AI Client: the single point of entry for all chat-completion calls.
///
/// No other module may call the AI gateway directly. Every call forces exactly
/// one function tool so the answer comes back as machine-parseable arguments.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI gateway rate limit exceeded")]
    RateLimited,

    #[error("AI gateway requires payment")]
    PaymentRequired,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("AI response carried no tool call")]
    MissingToolCall,
}

/// A function tool offered to the model. The model is forced to call it.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    tools: [ToolDefinition<'a>; 1],
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolSpec,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: NamedFunction<'a>,
}

#[derive(Debug, Serialize)]
struct NamedFunction<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletion {
    /// Arguments of the first tool call of the first choice, if any.
    pub fn tool_arguments(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .tool_calls
            .as_ref()?
            .first()?
            .function
            .arguments
            .as_deref()
            .filter(|args| !args.trim().is_empty())
    }
}

/// The AI client shared by the resume extractor and the match scorer.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat request that must be answered through `tool`, and returns
    /// the tool-call arguments as a JSON value. Failures are not retried.
    pub async fn call_tool(
        &self,
        system: &str,
        prompt: &str,
        tool: &ToolSpec,
    ) -> Result<Value, AiError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            tools: [ToolDefinition {
                kind: "function",
                function: tool,
            }],
            tool_choice: ToolChoice {
                kind: "function",
                function: NamedFunction { name: tool.name },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, tool = tool.name, "AI gateway error: {body}");
            return Err(classify_failure(status, body));
        }

        let completion: ChatCompletion = response.json().await?;
        if let Some(usage) = &completion.usage {
            debug!(
                tool = tool.name,
                "AI call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        parse_tool_arguments(&completion)
    }

    /// Convenience wrapper that deserializes the tool-call arguments into `T`.
    pub async fn call_tool_as<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        tool: &ToolSpec,
    ) -> Result<T, AiError> {
        let value = self.call_tool(system, prompt, tool).await?;
        serde_json::from_value(value).map_err(AiError::Parse)
    }
}

fn classify_failure(status: StatusCode, body: String) -> AiError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => AiError::PaymentRequired,
        _ => AiError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

fn parse_tool_arguments(completion: &ChatCompletion) -> Result<Value, AiError> {
    let arguments = completion
        .tool_arguments()
        .ok_or(AiError::MissingToolCall)?;
    Ok(serde_json::from_str(arguments)?)
}

/// Fills `{name}` placeholders in a single pass. Substituted values are never
/// rescanned, so user text containing braces is sent as written. Unknown
/// placeholders are left in place.
pub fn render_prompt(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let filled = tail[1..].find('}').and_then(|end| {
            let key = &tail[1..end + 1];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end + 2))
        });
        match filled {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
