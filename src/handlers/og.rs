use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use super::OgError;
use crate::{
    config::FontConfig,
    models::ArticleSummary,
    svg::{self, COVER_HEIGHT, COVER_WIDTH, HEIGHT, LINE_HEIGHT, WIDTH},
    templates::{self, Templates},
    AppState,
};

/// A year of shared-cache lifetime with background revalidation. The
/// article id is the cache key; the CDN absorbs repeat traffic since this
/// service keeps no cache of its own.
const CACHE_CONTROL: &str = "s-maxage=31536000, stale-while-revalidate";

#[derive(Deserialize)]
pub struct OgQuery {
    id: Option<String>,
}

#[derive(Serialize)]
struct OgTemplateContext<'a> {
    width: u32,
    height: u32,
    family: &'a str,
    lines: &'a [String],
    line_height: u32,
    title_y: u32,
    cover: Option<&'a str>,
    cover_y: u32,
    cover_width: u32,
    cover_height: u32,
}

pub async fn get_og(
    Query(query): Query<OgQuery>,
    State(state): State<AppState>,
) -> Result<Response, OgError> {
    let id = match query.id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return Err(OgError::MissingId),
    };
    // A lookup miss and a backend failure are deliberately indistinguishable
    // to the caller, but not to the logs.
    let article = match state.articles.get_summary(id).await {
        Ok(Some(article)) => article,
        Ok(None) => {
            tracing::debug!("No article found for id {id}");
            return Err(OgError::NotFound);
        }
        Err(err) => {
            tracing::error!("Article lookup failed for id {id}: {err:?}");
            return Err(OgError::NotFound);
        }
    };
    let png = generate(&state, &article).await?;
    Ok((
        [(header::CONTENT_TYPE, "image/png"), (header::CACHE_CONTROL, CACHE_CONTROL)],
        BASE64.encode(&png),
    )
        .into_response())
}

async fn generate(state: &AppState, article: &ArticleSummary) -> Result<Vec<u8>> {
    let fonts = &state.config.fonts;
    // The admin form stores an empty image field as null, but older rows
    // may carry the empty string; treat both as "no cover".
    let cover_url = article.image.as_deref().filter(|url| !url.is_empty());
    let (faces, cover) =
        tokio::try_join!(fetch_fonts(&state.http, fonts), fetch_cover(&state.http, cover_url))?;
    let svg_src = compose(&state.templates, &fonts.family, &article.title, cover.as_deref())?;
    svg::render_png(&svg_src, &fonts.family, &faces)
}

fn compose(
    templates: &Templates,
    family: &str,
    title: &str,
    cover: Option<&[u8]>,
) -> Result<String> {
    let lines = svg::wrap_title(title);
    let cover_uri = cover.map(svg::cover_data_uri).transpose()?;
    let layout = svg::layout(lines.len(), cover_uri.is_some());
    templates::render(templates, "og.svg", OgTemplateContext {
        width: WIDTH,
        height: HEIGHT,
        family,
        lines: &lines,
        line_height: LINE_HEIGHT,
        title_y: layout.title_y,
        cover: cover_uri.as_deref(),
        cover_y: layout.cover_y,
        cover_width: COVER_WIDTH,
        cover_height: COVER_HEIGHT,
    })
}

async fn fetch_fonts(client: &reqwest::Client, fonts: &FontConfig) -> Result<Vec<Vec<u8>>> {
    let (regular, bold) = tokio::try_join!(
        fetch_font(client, &fonts.regular_url),
        fetch_font(client, &fonts.bold_url)
    )?;
    Ok(vec![regular, bold])
}

async fn fetch_font(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("Failed to fetch font {url}"))?;
    Ok(response.bytes().await.context("Failed to read font body")?.to_vec())
}

async fn fetch_cover(client: &reqwest::Client, url: Option<&str>) -> Result<Option<Vec<u8>>> {
    let Some(url) = url else { return Ok(None) };
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("Failed to fetch article image {url}"))?;
    Ok(Some(response.bytes().await.context("Failed to read article image body")?.to_vec()))
}
