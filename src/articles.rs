use anyhow::{Context, Result};
use reqwest::{header, StatusCode};
use url::Url;

use crate::{config::SupabaseConfig, models::ArticleSummary};

/// Media type for PostgREST single-object responses.
const PGRST_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Read-only client for the hosted article table. Constructed once at
/// startup and shared across requests; holds no mutable state.
pub struct ArticleClient {
    http: reqwest::Client,
    endpoint: Url,
    key: String,
}

impl ArticleClient {
    pub fn new(config: &SupabaseConfig, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(&config.url).context("Invalid Supabase URL")?;
        let endpoint = base
            .join(&format!("rest/v1/{}", config.table))
            .context("Invalid Supabase table name")?;
        Ok(Self { http, endpoint, key: config.key.clone() })
    }

    /// Single-row lookup of `title` and `image` by article id.
    ///
    /// `Ok(None)` when no row matches; `Err` on any transport or backend
    /// failure. The caller decides how (or whether) to distinguish the two.
    pub async fn get_summary(&self, id: &str) -> Result<Option<ArticleSummary>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "title,image")
            .append_pair("id", &format!("eq.{id}"));
        let response = self
            .http
            .get(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header(header::ACCEPT, PGRST_OBJECT)
            .send()
            .await
            .context("Article lookup request failed")?;
        // PostgREST answers 406 when a single-object request matches no rows
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }
        let response =
            response.error_for_status().context("Article lookup returned an error status")?;
        let article =
            response.json::<ArticleSummary>().await.context("Failed to parse article record")?;
        Ok(Some(article))
    }
}
