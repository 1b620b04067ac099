use super::models::FetchedImage;
use crate::config::RelayConfig;
use crate::error::{AppResult, Error};
use reqwest::{header, Client};
use tracing::{debug, info};

/// Fetch the source image with browser-like headers so hot-link protection lets it through.
///
/// Any network failure, non-2xx status or empty body fails the whole relay; there is no retry.
pub async fn fetch_source(
    client: &Client,
    config: &RelayConfig,
    source_url: &str,
) -> AppResult<FetchedImage> {
    let fetch_error = |reason: String| Error::UpstreamFetch {
        url: source_url.to_string(),
        reason,
    };

    let url = url::Url::parse(source_url).map_err(|e| fetch_error(format!("Invalid URL: {e}")))?;
    let origin = config.referer.trim_end_matches('/');

    debug!("Fetching source image from {}", url);

    let res = client
        .get(url)
        .header(header::USER_AGENT, &config.user_agent)
        .header(
            header::ACCEPT,
            "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8",
        )
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(header::REFERER, &config.referer)
        .header(header::ORIGIN, origin)
        .header("sec-fetch-dest", "image")
        .header("sec-fetch-mode", "no-cors")
        .header("sec-fetch-site", "cross-site")
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {status}")));
    }

    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_lowercase());

    let image = FetchedImage {
        bytes: res.bytes().await.map_err(|e| fetch_error(e.to_string()))?,
        content_type,
    };
    if image.is_empty() {
        return Err(fetch_error("Empty response body".to_string()));
    }

    info!(
        "Fetched {} bytes ({}) from {}",
        image.len(),
        image.content_type.as_deref().unwrap_or("unknown type"),
        source_url
    );

    Ok(image)
}
