use std::sync::Arc;

use research_core::Quiz;
use research_logging::{research_info, research_warn};
use serde::Deserialize;

use crate::generate::{GenerateError, TextGenerator};
use crate::prompt::quiz_prompt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("quiz generation failed: {0}")]
    Generation(GenerateError),
    #[error("quiz response was malformed: {0}")]
    Malformed(String),
}

/// Shape the model is asked to produce. Every key is required.
#[derive(Debug, Deserialize)]
struct RawQuiz {
    question: String,
    options: Vec<String>,
    answer: String,
    explanation: String,
}

pub struct QuizGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl QuizGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, api_key: &str, query: &str, summary: &str) -> Result<Quiz, QuizError> {
        let prompt = quiz_prompt(query, summary);
        let raw = self
            .generator
            .generate(&prompt, api_key)
            .await
            .map_err(QuizError::Generation)?;

        match parse_quiz(&raw) {
            Ok(quiz) => {
                research_info!("quiz generated for {:?}", query);
                Ok(quiz)
            }
            Err(err) => {
                research_warn!("discarding quiz for {:?}: {}", query, err);
                Err(err)
            }
        }
    }
}

/// Parse and validate a model response, fenced or not.
///
/// Requires all four keys, exactly four options, and an answer that is one
/// of the options.
pub fn parse_quiz(raw: &str) -> Result<Quiz, QuizError> {
    let json = strip_code_fence(raw);
    let quiz: RawQuiz =
        serde_json::from_str(json).map_err(|err| QuizError::Malformed(err.to_string()))?;

    Quiz::new(quiz.question, quiz.options, quiz.answer, quiz.explanation)
        .map_err(|err| QuizError::Malformed(err.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, nothing).
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
