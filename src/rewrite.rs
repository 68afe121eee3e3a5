use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::RewrittenArticle;

// ── Constants ────────────────────────────────────────────────────────────────

const GENERATION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
const GENERATION_MODEL: &str = "gemini-2.5-flash";
const MAX_TOKENS: u32 = 3000;
const TEMPERATURE: f32 = 0.7;

/// The generation call gets more headroom than the page fetches; long
/// completions routinely take tens of seconds.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

// ── Lazy static regexes ──────────────────────────────────────────────────────

// Generation services like to wrap the requested JSON in a code fence even
// when told not to; one leading and one trailing fence are stripped before
// the strict parse.

static FENCE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?\s*").unwrap());

static FENCE_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```$").unwrap());

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("generation request failed: {0}")]
    Upstream(String),
    #[error("generation response did not match the required structure: {0}")]
    MalformedResponse(String),
}

// ── Wire types (OpenAI-chat-style) ───────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Rewrite the article into a casual tone. One attempt, no retry; the caller
/// supplies the credential per call and this module holds no state.
pub async fn rewrite(
    client: &reqwest::Client,
    api_key: &str,
    headline: &str,
    content: &str,
) -> Result<RewrittenArticle, RewriteError> {
    let prompt = build_prompt(headline, content);
    let request = ChatRequest {
        model: GENERATION_MODEL,
        messages: vec![ChatMessage {
            role: "user",
            content: &prompt,
        }],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let response = client
        .post(GENERATION_ENDPOINT)
        .bearer_auth(api_key)
        .timeout(GENERATION_TIMEOUT)
        .json(&request)
        .send()
        .await
        .map_err(|e| RewriteError::Upstream(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RewriteError::Upstream(format!("HTTP {}", status)));
    }

    let body: ChatResponse = response
        .json()
        .await
        .map_err(|e| RewriteError::MalformedResponse(e.to_string()))?;

    let raw = body
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| RewriteError::MalformedResponse("response contained no choices".into()))?;

    parse_rewritten(&raw)
}

/// Instructional prompt embedding both fields verbatim and mandating strict
/// two-key JSON output.
fn build_prompt(headline: &str, content: &str) -> String {
    format!(
        "Transform this formal news article into a casual, conversational style. \
         Make the headline engaging and informal. The headline should contain brief \
         information of the news. Rewrite the entire content to be user-friendly \
         while keeping all important facts.\n\n\
         Article Headline:\n{headline}\n\n\
         Article Content:\n{content}\n\n\
         Please provide the output STRICTLY in a valid JSON format with exactly two \
         keys: \"headline_reframed\" and \"content_reframed\"."
    )
}

/// Normalize then strictly parse the service's free-text reply. Anything
/// beyond fence wrapping fails closed as [`RewriteError::MalformedResponse`].
pub fn parse_rewritten(raw: &str) -> Result<RewrittenArticle, RewriteError> {
    let cleaned = strip_code_fence(raw.trim());
    serde_json::from_str(&cleaned).map_err(|e| RewriteError::MalformedResponse(e.to_string()))
}

fn strip_code_fence(text: &str) -> String {
    let without_open = FENCE_OPEN_RE.replace(text, "");
    FENCE_CLOSE_RE.replace(&without_open, "").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
