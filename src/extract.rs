use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::models::ExtractedArticle;

// ── Constants ────────────────────────────────────────────────────────────────

pub const HOMEPAGE_URL: &str = "https://www.thehindu.com/topic/live-news/";
const SITE_ORIGIN: &str = "https://www.thehindu.com";

const NO_HEADLINE: &str = "No headline found";
const NO_CONTENT: &str = "No content found";
const UNKNOWN_AUTHOR: &str = "Unknown author";
const UNKNOWN_DATE: &str = "Unknown date";

// ── Lazy static selectors ────────────────────────────────────────────────────

// The selectors target thehindu.com's current markup and are the expected
// point of breakage when the site changes; they live only in this module.

/// Ordered chain for the lead card on the live-news listing, most specific
/// first. Later entries survive column-layout drift.
static LATEST_LINK_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "div.col-xl-6.col-lg-5.after-border-right div.element.main-row-element h3 > a[href]",
        "div.element.main-row-element h3 > a[href]",
        "div.element h3 > a[href]",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static HEADLINE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h1[itemprop="name"]"#).unwrap());

static MAIN_CONTENT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[itemprop="articleBody"]"#).unwrap());

static AUTHOR_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".author-name, .byline").unwrap());

static DATE_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "body > section.mt-4 > div > div > \
         div.col-xl-9.col-lg-8.col-md-12.col-sm-12.col-12.event > \
         div.update-publish-time > p > span",
    )
    .unwrap()
});

static EXPANDED_CONTENT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".articlebodycontent, .story-element-text").unwrap());

static ORIGIN_URL: Lazy<Url> = Lazy::new(|| Url::parse(SITE_ORIGIN).unwrap());

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("could not find latest article link")]
    NotFound,
    #[error("upstream returned HTTP {0}")]
    Upstream(u16),
    #[error("{0}")]
    Request(String),
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Scrape the most recent article: fetch the live-news listing, locate the
/// lead article's URL, fetch that page and extract its fields.
pub async fn scrape_latest(
    client: &reqwest::Client,
) -> Result<ExtractedArticle, ExtractionError> {
    let listing_html = fetch_html(client, HOMEPAGE_URL).await?;
    let article_url = find_latest_article_url(&listing_html)?;
    tracing::debug!(url = %article_url, "located latest article");

    let article_html = fetch_html(client, &article_url).await?;
    Ok(extract_article_fields(&article_html, &article_url))
}

/// Find the latest article's absolute URL in the listing page, trying each
/// selector in [`LATEST_LINK_SELECTORS`] in order. This is the one hard
/// failure in extraction: without a URL nothing downstream can run.
pub fn find_latest_article_url(listing_html: &str) -> Result<String, ExtractionError> {
    let document = Html::parse_document(listing_html);

    for selector in LATEST_LINK_SELECTORS.iter() {
        if let Some(href) = document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("href"))
        {
            return Ok(resolve_article_url(href));
        }
    }

    Err(ExtractionError::NotFound)
}

/// Extract per-field article data. Total: each field independently falls
/// back to its sentinel on a selector miss, so a degraded article is still a
/// valid result.
pub fn extract_article_fields(article_html: &str, url: &str) -> ExtractedArticle {
    let document = Html::parse_document(article_html);

    ExtractedArticle {
        headline: select_text(&document, &HEADLINE_SEL)
            .unwrap_or_else(|| NO_HEADLINE.to_string()),
        main_content: select_text(&document, &MAIN_CONTENT_SEL)
            .unwrap_or_else(|| NO_CONTENT.to_string()),
        author: select_text(&document, &AUTHOR_SEL)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        date: select_text(&document, &DATE_SEL).unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        expanded_content: select_text(&document, &EXPANDED_CONTENT_SEL).unwrap_or_default(),
        url: url.to_string(),
    }
}

// ── URL resolution ───────────────────────────────────────────────────────────

/// An href that already parses as an absolute URL passes through unchanged;
/// anything else is joined against the site origin.
fn resolve_article_url(href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    ORIGIN_URL
        .join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{}{}", SITE_ORIGIN, href))
}

// ── HTTP fetch ───────────────────────────────────────────────────────────────

async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String, ExtractionError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractionError::Request(format!("TimeoutError: {}", e))
        } else if e.is_connect() {
            ExtractionError::Request(format!("ConnectError: {}", e))
        } else {
            ExtractionError::Request(format!("RequestError: {}", e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractionError::Upstream(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| ExtractionError::Request(e.to_string()))
}

// ── DOM utility helpers ──────────────────────────────────────────────────────

/// Text of the first match, whitespace-normalized; `None` when the selector
/// misses or matches only whitespace.
fn select_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| normalize_text(el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Collapse whitespace runs and trim.
fn normalize_text(text: String) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ────────────────────────────────────────────────────────────────────
