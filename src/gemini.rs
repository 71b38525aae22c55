use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One turn of a conversation, in the wire shape the web client sends
/// (`{role, parts: [{text}]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn { role: "user".to_string(), parts: vec![Part { text: text.into() }] }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Turn { role: "model".to_string(), parts: vec![Part { text: text.into() }] }
    }
}

/// A single upstream generation call: the conversation plus the optional
/// schema constraint, system instruction, grounding tool and thinking
/// budget.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub turns: Vec<Turn>,
    pub system_instruction: Option<String>,
    pub response_schema: Option<Value>,
    pub thinking_budget: Option<i32>,
    pub web_search: bool,
}

impl ModelRequest {
    /// A one-shot user prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        ModelRequest { turns: vec![Turn::user(text)], ..Default::default() }
    }

    pub fn conversation(turns: Vec<Turn>) -> Self {
        ModelRequest { turns, ..Default::default() }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_thinking_budget(mut self, budget: i32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// What came back: the concatenated candidate text plus any grounding
/// source chunks when web search was in play.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub sources: Vec<Value>,
}

/// The upstream collaborator seam. The gateway needs exactly one
/// operation; tests substitute a scripted stand-in.
#[allow(async_fn_in_trait)]
pub trait ContentModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelReply>;
}

/// Client for the Gemini `generateContent` REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            // Search-grounded generation can take a while.
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        GeminiClient { client, api_key: api_key.into(), model: model.into() }
    }

    fn request_body(request: &ModelRequest) -> Value {
        let contents: Vec<Value> = request
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role,
                    "parts": turn.parts.iter().map(|p| json!({"text": p.text})).collect::<Vec<_>>(),
                })
            })
            .collect();

        let mut body = json!({ "contents": contents });

        let mut generation_config = serde_json::Map::new();
        if let Some(schema) = &request.response_schema {
            generation_config.insert("responseMimeType".to_string(), json!("application/json"));
            generation_config.insert("responseSchema".to_string(), schema.clone());
        }
        if let Some(budget) = request.thinking_budget {
            generation_config.insert("thinkingConfig".to_string(), json!({"thinkingBudget": budget}));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        if request.web_search {
            body["tools"] = json!([{"googleSearch": {}}]);
        }
        if let Some(instruction) = &request.system_instruction {
            body["systemInstruction"] = json!({"parts": [{"text": instruction}]});
        }

        body
    }

    fn parse_reply(response: &Value) -> Result<ModelReply> {
        let candidate = &response["candidates"][0];
        let parts = candidate["content"]["parts"]
            .as_array()
            .ok_or_else(|| anyhow!("Invalid Gemini response format"))?;

        let text: String = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(anyhow!("Gemini returned no text"));
        }

        let sources = candidate["groundingMetadata"]["groundingChunks"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        Ok(ModelReply { text, sources })
    }
}

impl ContentModel for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> Result<ModelReply> {
        let body = Self::request_body(&request);
        let url = format!("{}/models/{}:generateContent", API_BASE, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to reach the Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let response_json: Value = response
            .json()
            .await
            .context("Failed to read Gemini API response")?;

        Self::parse_reply(&response_json)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted stand-in for the upstream model: replays queued replies in
    /// order and records every request it saw.
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<ModelReply>>>,
        requests: Mutex<Vec<ModelRequest>>,
    }

    impl ScriptedModel {
        pub fn new(replies: Vec<Result<ModelReply>>) -> Self {
            ScriptedModel {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A model that always answers with the same text.
        pub fn text(reply: &str) -> Self {
            Self::new(vec![Ok(ModelReply { text: reply.to_string(), sources: Vec::new() })])
        }

        pub fn reply(text: &str) -> Result<ModelReply> {
            Ok(ModelReply { text: text.to_string(), sources: Vec::new() })
        }

        pub fn reply_with_sources(text: &str, sources: Vec<Value>) -> Result<ModelReply> {
            Ok(ModelReply { text: text.to_string(), sources })
        }

        pub fn failure(message: &str) -> Result<ModelReply> {
            Err(anyhow!("{}", message.to_string()))
        }

        pub fn requests(&self) -> Vec<ModelRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ContentModel for ScriptedModel {
        async fn generate(&self, request: ModelRequest) -> Result<ModelReply> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_parsing_joins_candidate_parts() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "world"}]}
            }]
        });
        let reply = GeminiClient::parse_reply(&response).unwrap();
        assert_eq!(reply.text, "Hello world");
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn reply_parsing_extracts_grounding_chunks() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "grounded"}]},
                "groundingMetadata": {"groundingChunks": [{"web": {"uri": "https://example.com"}}]}
            }]
        });
        let reply = GeminiClient::parse_reply(&response).unwrap();
        assert_eq!(reply.sources.len(), 1);
    }

    #[test]
    fn missing_candidates_is_an_error() {
        let response = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(GeminiClient::parse_reply(&response).is_err());
    }

    #[test]
    fn empty_text_is_an_error() {
        let response = json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}]
        });
        assert!(GeminiClient::parse_reply(&response).is_err());
    }

    #[test]
    fn request_body_carries_schema_and_thinking_config() {
        let request = ModelRequest::prompt("hi")
            .with_schema(json!({"type": "OBJECT"}))
            .with_thinking_budget(0);
        let body = GeminiClient::request_body(&request);

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn request_body_carries_search_tool_and_system_instruction() {
        let request = ModelRequest::prompt("hi")
            .with_web_search()
            .with_system_instruction("be brief");
        let body = GeminiClient::request_body(&request);

        assert!(body["tools"][0].get("googleSearch").is_some());
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(body.get("generationConfig").is_none());
    }
}
