//! Chat payloads for asking a model for keywords, and decoding its reply.
//!
//! The HTTP round-trip is left to the caller; this module only shapes the
//! request body and reads the response body.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mindscribe_shared::Keywords;

use crate::extract::extract;

/// Build the user prompt asking for a JSON array of domain terms.
pub fn keyword_prompt(text: &str) -> String {
    format!(
        "Please analyze the following text and extract the key domain terms and concepts.\n\
         Return only a JSON array of strings with the extracted keywords.\n\
         For example: [\"term1\", \"term2\", \"term3\"]\n\
         \n\
         Text to analyze:\n\
         {text}\n"
    )
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for a keyword-extraction chat call.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordRequest {
    pub messages: Vec<ChatMessage>,
}

impl KeywordRequest {
    /// Build the request for `text`, with an optional leading system prompt.
    pub fn new(text: &str, system_prompt: Option<&str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt.filter(|s| !s.trim().is_empty()) {
            messages.push(ChatMessage {
                role: Role::System,
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: Role::User,
            content: keyword_prompt(text),
        });
        Self { messages }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Response body of the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub text: String,
}

/// Extract keywords from a chat response body.
///
/// A body that is not `{"text": ...}` JSON is treated as the completion text
/// itself.
pub fn extract_from_response(body: &str) -> Keywords {
    match serde_json::from_str::<ChatCompletion>(body) {
        Ok(completion) => extract(&completion.text),
        Err(e) => {
            debug!(error = %e, "response body is not a chat completion, using it as raw text");
            extract(body)
        }
    }
}
