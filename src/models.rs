use serde::{Deserialize, Serialize};

/// Fields pulled out of an article page. Every field is best-effort: a
/// selector miss yields the sentinel chosen in `extract`, never an error.
#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    pub headline: String,
    pub main_content: String,
    pub author: String,
    pub date: String,
    pub expanded_content: String,
    pub url: String,
}

/// The two-key object the generation service is instructed to return.
/// Unknown fields are rejected so that anything other than the exact
/// requested shape fails the parse.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RewrittenArticle {
    pub headline_reframed: String,
    pub content_reframed: String,
}

#[derive(Debug, Serialize)]
pub struct NewsItem {
    pub headline: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct NewsPayload {
    pub success: bool,
    pub news: NewsItem,
}
