use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use research_logging::research_debug;
use serde::{Deserialize, Serialize};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const ERROR_BODY_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("api key is empty")]
    MissingCredential,
    #[error("api key contains characters that cannot be sent")]
    MalformedCredential,
    #[error("api key was rejected: {0}")]
    CredentialRejected(String),
    #[error("generation request timed out")]
    Timeout,
    #[error("generation service returned http status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("generation request failed: {0}")]
    Network(String),
    #[error("could not decode generation response: {0}")]
    Decode(String),
    #[error("generation returned no text{}", block_suffix(.block_reason))]
    EmptyResponse { block_reason: Option<String> },
}

fn block_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|reason| format!(" (blocked: {reason})"))
        .unwrap_or_default()
}

impl GenerateError {
    /// Faults the user must fix before any retry can succeed.
    pub fn is_credential_fault(&self) -> bool {
        matches!(
            self,
            GenerateError::MissingCredential
                | GenerateError::MalformedCredential
                | GenerateError::CredentialRejected(_)
        )
    }
}

/// Hosted generative-text service.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: GEMINI_API_URL.to_string(),
            model: "gemini-1.5-flash".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: GeminiSettings,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GenerateError::Network(err.to_string()))?;
        Ok(Self { settings, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn headers(api_key: &str) -> Result<HeaderMap, GenerateError> {
        let key = api_key.trim();
        if key.is_empty() {
            return Err(GenerateError::MissingCredential);
        }
        let mut headers = HeaderMap::new();
        let mut value =
            HeaderValue::from_str(key).map_err(|_| GenerateError::MalformedCredential)?;
        value.set_sensitive(true);
        headers.insert("x-goog-api-key", value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GenerateError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        research_debug!(
            "generation request model={} prompt_chars={}",
            self.settings.model,
            prompt.chars().count()
        );

        let response = self
            .http
            .post(self.endpoint())
            .headers(Self::headers(api_key)?)
            .json(&request)
            .send()
            .await
            .map_err(map_generate_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GenerateError::Decode(err.to_string()))?;
        body.into_text()
    }
}

fn map_generate_error(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Network(err.to_string())
    }
}

fn classify_status(status: StatusCode, body: &str) -> GenerateError {
    let invalid_key = body.contains("API_KEY_INVALID") || body.contains("API key not valid");
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || (status == StatusCode::BAD_REQUEST && invalid_key)
    {
        return GenerateError::CredentialRejected(status.to_string());
    }
    let message: String = body.trim().chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    GenerateError::Http {
        status: status.as_u16(),
        message,
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, GenerateError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse {
                block_reason: self.prompt_feedback.and_then(|f| f.block_reason),
            });
        }
        Ok(text)
    }
}
