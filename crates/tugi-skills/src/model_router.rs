//! Model Router: sends persona + conversation to an LLM (mock or live Gemini) and returns generated text.

use serde::{Deserialize, Serialize};
use tugi_core::{ConversationTurn, CoreConfig, GenerativeModel, ModelError, TurnPart, DEFAULT_GEMINI_API_BASE};

/// Mode for LLM invocation: mock (returns simulated generation) or live (calls Gemini `generateContent`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

impl LlmMode {
    pub fn from_config_str(mode: &str) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "live" => LlmMode::Live,
            _ => LlmMode::Mock,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmMode::Mock => "mock",
            LlmMode::Live => "live",
        }
    }
}

/// Routes a conversation to a mock LLM or the live Gemini API.
pub struct ModelRouter {
    mode: LlmMode,
    model: String,
    api_base: String,
    api_key: Option<String>,
    client: reqwest::Client,
    label: String,
}

impl ModelRouter {
    /// Mock router; never touches the network.
    pub fn mock() -> Self {
        Self::build(LlmMode::Mock, "gemini-1.5-flash".to_string(), DEFAULT_GEMINI_API_BASE.to_string(), None)
    }

    /// Live Gemini router.
    pub fn live(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::build(
            LlmMode::Live,
            model.into(),
            DEFAULT_GEMINI_API_BASE.to_string(),
            Some(api_key.into()),
        )
    }

    /// Builds from gateway config. Live mode without an API key is an error.
    pub fn from_config(config: &CoreConfig) -> Result<Self, ModelError> {
        let mode = LlmMode::from_config_str(&config.llm_mode);
        if mode == LlmMode::Live && config.gemini_api_key.is_none() {
            return Err(ModelError::MissingApiKey);
        }
        Ok(Self::build(
            mode,
            config.model.clone(),
            config.gemini_api_base.clone(),
            config.gemini_api_key.clone(),
        ))
    }

    fn build(mode: LlmMode, model: String, api_base: String, api_key: Option<String>) -> Self {
        let label = format!("{}:{}", mode.as_str(), model);
        Self {
            mode,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
            label,
        }
    }

    /// Mock LLM: returns a deterministic in-character response based on the last user turn.
    fn mock_generate(&self, contents: &[ConversationTurn]) -> String {
        let last = contents.last().map(|t| t.text()).unwrap_or_default();
        let first_line = last.lines().next().unwrap_or("").trim();
        let preview: String = first_line.chars().take(40).collect();
        let ellipsis = if first_line.chars().count() > 40 { "…" } else { "" };
        let reference = if last.contains("[참고할 맛집 정보]") {
            " 괜찮은 데 하나 알려주께."
        } else {
            ""
        };
        format!("마! \"{}{}\" 말이가?{} [Generated – Mock LLM]", preview, ellipsis, reference)
    }

    async fn live_generate(&self, persona: &str, contents: &[ConversationTurn]) -> Result<String, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let request = GenerateContentRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![TurnPart { text: persona.to_string() }],
            },
            contents,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Api(format!("undecodable response: {}", e)))?;
        parsed.into_text()
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::mock()
    }
}

#[async_trait::async_trait]
impl GenerativeModel for ModelRouter {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, persona: &str, contents: &[ConversationTurn]) -> Result<String, ModelError> {
        match self.mode {
            LlmMode::Mock => Ok(self.mock_generate(contents)),
            LlmMode::Live => {
                tracing::debug!(
                    target: "tugi::model",
                    model = %self.model,
                    turns = contents.len(),
                    "Calling generateContent"
                );
                self.live_generate(persona, contents).await
            }
        }
    }
}

/// Caller turns are serialized as received; only the persona is shaped here.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: GeminiContent,
    contents: &'a [ConversationTurn],
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<TurnPart>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String, ModelError> {
        if let Some(error) = self.error {
            return Err(ModelError::Api(error.message));
        }
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyReply);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_mode_echoes_last_turn() {
        let router = ModelRouter::mock();
        let contents = vec![
            ConversationTurn::user("안녕"),
            ConversationTurn::model("마!"),
            ConversationTurn::user("해운대 맛집\n\n[참고할 맛집 정보]:\n- 이름: A"),
        ];
        let text = router.generate("persona", &contents).await.unwrap();
        assert!(text.starts_with("마!"));
        assert!(text.contains("해운대 맛집"));
        assert!(text.contains("알려주께"));
        assert!(!text.contains("이름: A"));
    }

    #[test]
    fn mode_parsing_defaults_to_mock() {
        assert_eq!(LlmMode::from_config_str("live"), LlmMode::Live);
        assert_eq!(LlmMode::from_config_str(" LIVE "), LlmMode::Live);
        assert_eq!(LlmMode::from_config_str("openai"), LlmMode::Mock);
    }

    #[tokio::test]
    async fn live_without_key_fails() {
        let mut router = ModelRouter::live("gemini-1.5-flash", "k");
        router.api_key = None;
        let err = router.generate("p", &[ConversationTurn::user("x")]).await.unwrap_err();
        assert!(matches!(err, ModelError::MissingApiKey));
    }

    #[test]
    fn request_uses_gemini_field_names() {
        let contents = vec![ConversationTurn::user("hi")];
        let request = GenerateContentRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![TurnPart { text: "persona".into() }],
            },
            contents: &contents,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system_instruction"]["parts"][0]["text"], "persona");
        assert!(json["system_instruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn request_forwards_caller_turns_untouched() {
        let turn = serde_json::json!({
            "role": "model",
            "parts": [{ "text": "a", "thought": true }, { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }]
        });
        let contents = vec![
            serde_json::from_value::<ConversationTurn>(turn.clone()).unwrap(),
            ConversationTurn::user("x"),
        ];
        let request = GenerateContentRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![TurnPart { text: "p".into() }],
            },
            contents: &contents,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0], turn);
        assert_eq!(json["contents"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn response_text_is_joined() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "마! " }, { "text": "가자" }] } }]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "마! 가자");
    }

    #[test]
    fn blocked_or_error_responses_fail() {
        let blocked: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [{}] })).unwrap();
        assert!(matches!(blocked.into_text(), Err(ModelError::EmptyReply)));

        let errored: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "error": { "code": 400, "message": "bad key" } })).unwrap();
        assert!(matches!(errored.into_text(), Err(ModelError::Api(m)) if m == "bad key"));
    }
}
