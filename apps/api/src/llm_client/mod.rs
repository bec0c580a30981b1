//! LLM Client: the only module that talks to the Anthropic Messages API.
//!
//! The advisor sends one user turn per call with a per-call [`CallParams`]
//! (token budget, temperature, JSON-object mode). Transient failures (429, 5xx,
//! transport) are retried with exponential backoff. Callers own the fallback:
//! whatever is left after the last attempt comes back as an `LlmError`.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";

/// Explanations and three-line rewrites are short.
pub const DEFAULT_MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Opening of the assistant turn in JSON-object mode. The model continues
/// from it, so the reply can only be an object.
const JSON_PREFILL: &str = "{";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call generation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallParams {
    pub max_tokens: u32,
    /// `None` leaves the API default in place.
    pub temperature: Option<f32>,
    pub json_object: bool,
}

impl Default for CallParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            json_object: false,
        }
    }
}

impl CallParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn json_object(mut self) -> Self {
        self.json_object = true;
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    system: &'a str,
    messages: Vec<Turn<'a>>,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    fn new(prompt: &'a str, system: &'a str, params: CallParams) -> Self {
        let mut messages = vec![Turn {
            role: "user",
            content: prompt,
        }];
        if params.json_object {
            messages.push(Turn {
                role: "assistant",
                content: JSON_PREFILL,
            });
        }
        Self {
            model: MODEL,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system,
            messages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    content: Vec<Block>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesReply {
    fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            Block::Text { text } => Some(text.as_str()),
            Block::Other => None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Outcome of a single failed attempt.
enum Failure {
    Transient(LlmError),
    Fatal(LlmError),
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    backoff: Duration,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, MESSAGES_URL)
    }

    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            endpoint: endpoint.into(),
            backoff: BASE_BACKOFF,
        })
    }

    /// Delay before the second attempt; it doubles for each attempt after that.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sends one prompt and returns the first text block. In JSON-object mode
    /// the prefill is put back in front of the text.
    pub async fn complete(&self, prompt: &str, system: &str, params: CallParams) -> Result<String, LlmError> {
        let request = MessagesRequest::new(prompt, system, params);
        let reply = self.send_with_retry(&request).await?;

        if let Some(usage) = &reply.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "llm call succeeded"
            );
        }

        let text = reply.first_text().ok_or(LlmError::EmptyContent)?;
        if params.json_object {
            Ok(format!("{JSON_PREFILL}{text}"))
        } else {
            Ok(text.to_string())
        }
    }

    /// [`complete`](Self::complete) in JSON-object mode, decoded into `T`.
    /// Code fences around the object are tolerated.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        params: CallParams,
    ) -> Result<T, LlmError> {
        let text = self.complete(prompt, system, params.json_object()).await?;
        Ok(serde_json::from_str(strip_json_fences(&text))?)
    }

    async fn send_with_retry(&self, request: &MessagesRequest<'_>) -> Result<MessagesReply, LlmError> {
        let mut attempt = 1;
        loop {
            match self.send_once(request).await {
                Ok(reply) => return Ok(reply),
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Transient(e)) if attempt < MAX_ATTEMPTS => {
                    let delay = self.backoff * 2u32.pow(attempt - 1);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "llm request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(Failure::Transient(e)) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request: &MessagesRequest<'_>) -> Result<MessagesReply, Failure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| Failure::Transient(LlmError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<MessagesReply>()
                .await
                .map_err(|e| Failure::Fatal(LlmError::Http(e)));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        let error = LlmError::Api {
            status: status.as_u16(),
            message,
        };

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(Failure::Transient(error))
        } else {
            Err(Failure::Fatal(error))
        }
    }
}

/// Removes a surrounding ```json … ``` or ``` … ``` fence.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Local stand-in for the Messages endpoint. Replies are served in order and
/// the last one repeats; every request body is recorded.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{header, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    #[derive(Clone)]
    struct Shared {
        replies: Arc<Vec<(u16, String)>>,
        hits: Arc<AtomicUsize>,
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    pub(crate) struct StubEndpoint {
        pub url: String,
        hits: Arc<AtomicUsize>,
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    impl StubEndpoint {
        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        pub fn bodies(&self) -> Vec<Value> {
            self.bodies.lock().unwrap().clone()
        }
    }

    /// Body of a successful Messages reply carrying `text`.
    pub(crate) fn text_reply(text: &str) -> String {
        serde_json::json!({
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 12, "output_tokens": 7}
        })
        .to_string()
    }

    async fn reply(State(shared): State<Shared>, Json(body): Json<Value>) -> impl axum::response::IntoResponse {
        shared.bodies.lock().unwrap().push(body);
        let n = shared.hits.fetch_add(1, Ordering::SeqCst);
        let (status, text) = shared.replies[n.min(shared.replies.len() - 1)].clone();
        (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            text,
        )
    }

    pub(crate) async fn serve(replies: Vec<(u16, String)>) -> StubEndpoint {
        let shared = Shared {
            replies: Arc::new(replies),
            hits: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(Mutex::new(Vec::new())),
        };
        let hits = shared.hits.clone();
        let bodies = shared.bodies.clone();

        let app = Router::new().route("/v1/messages", post(reply)).with_state(shared);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubEndpoint {
            url: format!("http://{addr}/v1/messages"),
            hits,
            bodies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::{serve, text_reply};
    use super::*;

    fn client_for(url: &str) -> LlmClient {
        LlmClient::with_endpoint("test-key".into(), url)
            .unwrap()
            .with_backoff(Duration::from_millis(1))
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_reply_text_skips_non_text_blocks() {
        let reply: MessagesReply = serde_json::from_str(
            r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":"hello"}],"usage":{"input_tokens":3,"output_tokens":1}}"#,
        )
        .unwrap();
        assert_eq!(reply.first_text(), Some("hello"));
    }

    #[test]
    fn test_request_carries_params() {
        let params = CallParams::default().with_temperature(0.7).json_object();
        let body = serde_json::to_value(MessagesRequest::new("rewrite", "sys", params)).unwrap();
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][1]["content"], "{");

        let plain = serde_json::to_value(MessagesRequest::new("explain", "sys", CallParams::default())).unwrap();
        assert!(plain.get("temperature").is_none());
        assert_eq!(plain["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_retried_then_succeeds() {
        let server = serve(vec![(500, "overloaded".into()), (200, text_reply("hello"))]).await;
        let text = client_for(&server.url)
            .complete("hi", "sys", CallParams::default())
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_gives_up_after_three_attempts() {
        let server = serve(vec![(429, r#"{"error":{"message":"slow down"}}"#.into())]).await;
        let err = client_for(&server.url)
            .complete("hi", "sys", CallParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, ref message } if message == "slow down"));
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = serve(vec![(400, r#"{"error":{"message":"bad request"}}"#.into())]).await;
        let err = client_for(&server.url)
            .complete("hi", "sys", CallParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 400, .. }));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_complete_json_restores_prefill() {
        #[derive(Deserialize)]
        struct Reply {
            answer: u32,
        }

        let server = serve(vec![(200, text_reply(r#""answer": 42}"#))]).await;
        let reply: Reply = client_for(&server.url)
            .complete_json("q", "sys", CallParams::default())
            .await
            .unwrap();
        assert_eq!(reply.answer, 42);
        assert_eq!(server.bodies()[0]["messages"][1]["content"], "{");
    }
}
