use serde::Deserialize;

/// The subset of a news article needed to render its OG card. Fetched once
/// per request and discarded; nothing is persisted by this service.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub image: Option<String>,
}
