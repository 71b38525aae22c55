use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;
use crate::gemini::{ContentModel, ModelRequest, Turn};
use crate::prompts;
use crate::schema;

/// Wire-level envelope of the generation endpoint: `{type, payload}`.
#[derive(Debug, Deserialize)]
pub struct RawRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// A validated generation request, one variant per wire type. Dispatch is
/// an exhaustive match; there is no duck-typed probing past this point.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Content {
        idea: String,
        platform: String,
        emotion_preset: Vec<String>,
        tone: String,
        language: String,
        template: Option<String>,
    },
    Insights {
        content: String,
        platform: String,
    },
    Refine {
        content: String,
        suggestions: Vec<String>,
        platform: String,
        tone: String,
    },
    Trending,
    TrendsAnalyzer {
        platform: String,
    },
    Explain {
        suggestion: String,
    },
    Chat {
        history: Vec<Turn>,
        system_instruction: String,
        tone: Option<String>,
        username: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    pub title: String,
    pub summary: String,
}

/// Successful gateway response, shaped per request type.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GatewayReply {
    Text { text: String },
    /// The parsed audit object, passed through at the top level.
    Insights(Value),
    Trends { trends: Vec<TrendItem>, sources: Vec<Value> },
}

fn invalid(message: &str) -> GatewayError {
    GatewayError::InvalidRequest(message.to_string())
}

impl GenerationRequest {
    /// Validate the envelope into a typed request. Empty strings count as
    /// missing, matching what the web client was already told.
    pub fn from_raw(raw: RawRequest) -> Result<Self, GatewayError> {
        let payload = raw.payload.unwrap_or(Value::Null);

        match raw.kind.as_str() {
            "content" => {
                #[derive(Deserialize)]
                #[serde(rename_all = "camelCase")]
                struct Payload {
                    idea: String,
                    platform: String,
                    emotion_preset: Vec<String>,
                    tone: String,
                    language: String,
                    #[serde(default)]
                    template: Option<String>,
                }
                let message = "Missing required fields for content generation.";
                let p: Payload =
                    serde_json::from_value(payload).map_err(|_| invalid(message))?;
                if [&p.idea, &p.platform, &p.tone, &p.language]
                    .iter()
                    .any(|s| s.trim().is_empty())
                {
                    return Err(invalid(message));
                }
                Ok(GenerationRequest::Content {
                    idea: p.idea,
                    platform: p.platform,
                    emotion_preset: p.emotion_preset,
                    tone: p.tone,
                    language: p.language,
                    template: p.template.filter(|t| !t.trim().is_empty()),
                })
            }
            "insights" => {
                #[derive(Deserialize)]
                struct Payload {
                    content: String,
                    platform: String,
                }
                let message = "'content' and 'platform' are required for insights.";
                let p: Payload =
                    serde_json::from_value(payload).map_err(|_| invalid(message))?;
                if p.content.trim().is_empty() || p.platform.trim().is_empty() {
                    return Err(invalid(message));
                }
                Ok(GenerationRequest::Insights { content: p.content, platform: p.platform })
            }
            "refine" => {
                #[derive(Deserialize)]
                struct Payload {
                    content: String,
                    suggestions: Vec<String>,
                    platform: String,
                    tone: String,
                }
                let message = "Missing required fields for content refinement.";
                let p: Payload =
                    serde_json::from_value(payload).map_err(|_| invalid(message))?;
                if [&p.content, &p.platform, &p.tone].iter().any(|s| s.trim().is_empty()) {
                    return Err(invalid(message));
                }
                Ok(GenerationRequest::Refine {
                    content: p.content,
                    suggestions: p.suggestions,
                    platform: p.platform,
                    tone: p.tone,
                })
            }
            "trending" => Ok(GenerationRequest::Trending),
            "trends_analyzer" => {
                #[derive(Deserialize)]
                struct Payload {
                    platform: String,
                }
                let message = "'platform' is required for trends analysis.";
                let p: Payload =
                    serde_json::from_value(payload).map_err(|_| invalid(message))?;
                if p.platform.trim().is_empty() {
                    return Err(invalid(message));
                }
                Ok(GenerationRequest::TrendsAnalyzer { platform: p.platform })
            }
            "explain" => {
                #[derive(Deserialize)]
                struct Payload {
                    suggestion: String,
                }
                let message = "A 'suggestion' is required to explain.";
                let p: Payload =
                    serde_json::from_value(payload).map_err(|_| invalid(message))?;
                if p.suggestion.trim().is_empty() {
                    return Err(invalid(message));
                }
                Ok(GenerationRequest::Explain { suggestion: p.suggestion })
            }
            "chat" => {
                #[derive(Deserialize)]
                #[serde(rename_all = "camelCase")]
                struct Payload {
                    history: Vec<Turn>,
                    system_instruction: String,
                    #[serde(default)]
                    tone: Option<String>,
                    #[serde(default)]
                    username: Option<String>,
                }
                let message = "'history' array and 'systemInstruction' string are required for chat.";
                let p: Payload =
                    serde_json::from_value(payload).map_err(|_| invalid(message))?;
                if p.system_instruction.trim().is_empty() {
                    return Err(invalid(message));
                }
                Ok(GenerationRequest::Chat {
                    history: p.history,
                    system_instruction: p.system_instruction,
                    tone: p.tone,
                    username: p.username,
                })
            }
            other => Err(invalid(&format!("Invalid request type: {}", other))),
        }
    }
}

/// Stateless dispatcher: shapes exactly one upstream call per request and
/// translates the reply into the wire response. No retries; concurrent
/// requests share nothing.
#[derive(Debug, Clone)]
pub struct Gateway<M> {
    model: M,
}

impl<M: ContentModel> Gateway<M> {
    pub fn new(model: M) -> Self {
        Gateway { model }
    }

    pub async fn handle(&self, request: GenerationRequest) -> Result<GatewayReply, GatewayError> {
        match request {
            GenerationRequest::Content { idea, platform, emotion_preset, tone, language, template } => {
                self.handle_content(idea, platform, emotion_preset, tone, language, template).await
            }
            GenerationRequest::Insights { content, platform } => {
                self.handle_insights(content, platform).await
            }
            GenerationRequest::Refine { content, suggestions, .. } => {
                self.handle_refine(content, suggestions).await
            }
            GenerationRequest::Trending => self.handle_trending().await,
            GenerationRequest::TrendsAnalyzer { platform } => {
                self.handle_trends_analyzer(platform).await
            }
            GenerationRequest::Explain { suggestion } => self.handle_explain(suggestion).await,
            GenerationRequest::Chat { history, system_instruction, tone, username } => {
                self.handle_chat(history, system_instruction, tone, username).await
            }
        }
    }

    fn platform_package(platform: &str) -> Option<(Value, &'static str)> {
        match platform {
            "youtube" => Some((schema::youtube_script(), prompts::YOUTUBE_DIRECTIVE)),
            "linkedin" => Some((schema::linkedin_post(), prompts::LINKEDIN_DIRECTIVE)),
            "x" => Some((schema::twitter_thread(), prompts::X_DIRECTIVE)),
            "instagram" => Some((schema::instagram_post(), prompts::INSTAGRAM_DIRECTIVE)),
            "blog" => Some((schema::blog_post(), prompts::BLOG_DIRECTIVE)),
            _ => None,
        }
    }

    async fn handle_content(
        &self,
        idea: String,
        platform: String,
        emotion_preset: Vec<String>,
        tone: String,
        language: String,
        template: Option<String>,
    ) -> Result<GatewayReply, GatewayError> {
        let reply = match Self::platform_package(&platform) {
            Some((schema, directive)) => {
                let header =
                    prompts::content_header(&idea, &emotion_preset, &tone, &language, template.as_deref());
                let prompt = format!("{}\n{}", header, directive);
                self.model
                    .generate(ModelRequest::prompt(prompt).with_schema(schema).with_thinking_budget(0))
                    .await?
            }
            // Unrecognized platforms get free-text generation, no schema.
            None => {
                let prompt =
                    prompts::fallback_content_prompt(&idea, &platform, &emotion_preset, &tone, &language);
                self.model
                    .generate(ModelRequest::prompt(prompt).with_thinking_budget(0))
                    .await?
            }
        };

        // Schema-constrained output is passed through unvalidated; the
        // client owns decoding the package JSON.
        Ok(GatewayReply::Text { text: reply.text })
    }

    async fn handle_insights(
        &self,
        content: String,
        platform: String,
    ) -> Result<GatewayReply, GatewayError> {
        let prompt = prompts::insights_prompt(&content, &platform);
        let reply = self
            .model
            .generate(ModelRequest::prompt(prompt).with_schema(schema::insights()))
            .await?;

        let parsed: Value = serde_json::from_str(&reply.text).map_err(|e| {
            log::error!("Failed to parse insights JSON from AI: {}", e);
            GatewayError::UpstreamFormat("analysis")
        })?;
        Ok(GatewayReply::Insights(parsed))
    }

    async fn handle_refine(
        &self,
        content: String,
        suggestions: Vec<String>,
    ) -> Result<GatewayReply, GatewayError> {
        let prompt = prompts::refine_prompt(&content, &suggestions);
        let reply = self
            .model
            .generate(ModelRequest::prompt(prompt).with_thinking_budget(0))
            .await?;
        Ok(GatewayReply::Text { text: reply.text })
    }

    async fn handle_trending(&self) -> Result<GatewayReply, GatewayError> {
        let reply = self
            .model
            .generate(ModelRequest::prompt(prompts::TRENDING_PROMPT).with_web_search())
            .await?;
        // The idea array stays an unparsed string; the caller decodes it.
        Ok(GatewayReply::Text { text: reply.text })
    }

    async fn handle_trends_analyzer(&self, platform: String) -> Result<GatewayReply, GatewayError> {
        let prompt = prompts::trends_analyzer_prompt(&platform);
        let reply = self
            .model
            .generate(ModelRequest::prompt(prompt).with_web_search())
            .await?;

        // Degrade to an empty trend list on malformed output; the grounding
        // sources are still worth returning.
        let trends: Vec<TrendItem> = match serde_json::from_str(&reply.text) {
            Ok(trends) => trends,
            Err(e) => {
                log::error!("Failed to parse trends JSON: {}", e);
                Vec::new()
            }
        };

        Ok(GatewayReply::Trends { trends, sources: reply.sources })
    }

    async fn handle_explain(&self, suggestion: String) -> Result<GatewayReply, GatewayError> {
        let reply = self
            .model
            .generate(ModelRequest::prompt(prompts::explain_prompt(&suggestion)))
            .await?;
        Ok(GatewayReply::Text { text: reply.text })
    }

    async fn handle_chat(
        &self,
        history: Vec<Turn>,
        system_instruction: String,
        tone: Option<String>,
        username: Option<String>,
    ) -> Result<GatewayReply, GatewayError> {
        let instruction = prompts::chat_system_instruction(
            username.as_deref(),
            tone.as_deref(),
            &system_instruction,
        );
        let reply = self
            .model
            .generate(ModelRequest::conversation(history).with_system_instruction(instruction))
            .await?;
        Ok(GatewayReply::Text { text: reply.text })
    }
}
