pub mod articles;
pub mod config;
pub mod handlers;
pub mod models;
pub mod svg;
pub mod templates;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::extract::FromRef;

use crate::{articles::ArticleClient, config::Config, templates::Templates};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub articles: Arc<ArticleClient>,
    pub http: reqwest::Client,
    pub templates: Templates,
}

impl AppState {
    /// Construct all process-wide clients up front. Configuration must
    /// already be validated; any failure here should abort startup.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        let articles = ArticleClient::new(&config.supabase, http.clone())?;
        Ok(Self {
            config: Arc::new(config),
            articles: Arc::new(articles),
            http,
            templates: templates::create("templates"),
        })
    }
}
