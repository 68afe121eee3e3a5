use chrono::Utc;

use crate::extract::{self, ExtractionError};
use crate::models::{NewsItem, NewsPayload, RewrittenArticle};
use crate::render;
use crate::rewrite::{self, RewriteError};
use crate::state::AppState;

/// Stage failures mapped to their user-visible messages. The inner error
/// stays server-side (logged, carried as `source`) and never reaches the
/// response body.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Gemini API key not configured")]
    MissingApiKey,
    #[error("Failed to scrape news")]
    Scrape(#[source] ExtractionError),
    #[error("Failed to reframe content")]
    Reframe(#[source] RewriteError),
}

/// One full Extract → Rewrite → Render run. Each run is independent and
/// stateless apart from the shared HTTP client; any stage failure is
/// terminal with no retry.
pub async fn run(state: &AppState) -> Result<NewsPayload, PipelineError> {
    // Checked before any I/O so a misconfigured deployment makes zero
    // outbound calls.
    let api_key = state
        .config
        .gemini_api_key
        .as_deref()
        .ok_or(PipelineError::MissingApiKey)?;

    tracing::info!("scraping latest news");
    let article = extract::scrape_latest(&state.http).await.map_err(|e| {
        tracing::error!(error = %e, "scrape stage failed");
        PipelineError::Scrape(e)
    })?;
    tracing::info!(
        headline = %article.headline,
        author = %article.author,
        date = %article.date,
        url = %article.url,
        "found article"
    );
    tracing::debug!(
        body_len = article.main_content.len(),
        expanded_len = article.expanded_content.len(),
        "extracted article body"
    );

    tracing::info!("reframing content");
    let rewritten = rewrite::rewrite(
        &state.http,
        api_key,
        &article.headline,
        &article.main_content,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "reframe stage failed");
        PipelineError::Reframe(e)
    })?;

    // Rendering is total; from here the run cannot fail.
    Ok(assemble_payload(rewritten))
}

fn assemble_payload(rewritten: RewrittenArticle) -> NewsPayload {
    NewsPayload {
        success: true,
        news: NewsItem {
            headline: rewritten.headline_reframed,
            content: render::markdown_to_html(&rewritten.content_reframed),
            timestamp: Utc::now().to_rfc3339(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::DateTime;

    fn state_without_key() -> AppState {
        let config = Config {
            gemini_api_key: None,
            listen_addr: "127.0.0.1:0".to_string(),
        };
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_io() {
        let err = run(&state_without_key()).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingApiKey));
    }

    #[test]
    fn error_messages_match_the_api_contract() {
        assert_eq!(
            PipelineError::MissingApiKey.to_string(),
            "Gemini API key not configured"
        );
        assert_eq!(
            PipelineError::Scrape(ExtractionError::NotFound).to_string(),
            "Failed to scrape news"
        );
        assert_eq!(
            PipelineError::Reframe(RewriteError::MalformedResponse("missing key".into()))
                .to_string(),
            "Failed to reframe content"
        );
    }

    #[test]
    fn payload_carries_rendered_html_and_parseable_timestamp() {
        let payload = assemble_payload(RewrittenArticle {
            headline_reframed: "Big day in parliament".to_string(),
            content_reframed: "So here's the deal: **budget day**.".to_string(),
        });

        assert!(payload.success);
        assert_eq!(payload.news.headline, "Big day in parliament");
        assert!(payload.news.content.contains("<strong>budget day</strong>"));
        assert!(DateTime::parse_from_rfc3339(&payload.news.timestamp).is_ok());
    }
}
