//! Site data loading from a local file or an HTTP(S) URL.

use thiserror::Error;
use tracing::instrument;

use super::types::SiteData;

/// Errors that can occur while loading site data.
#[derive(Debug, Error)]
pub enum SiteDataError {
    /// Reading the local file failed.
    #[error("failed to read site data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Fetching the remote document failed.
    #[error("failed to fetch site data: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote server answered with a non-success status.
    #[error("site data request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The document is not valid site data JSON.
    #[error("invalid site data JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the site data document.
///
/// `source` is either an `http://`/`https://` URL or a filesystem path.
///
/// # Errors
///
/// Returns an error if the document cannot be read or parsed.
#[instrument(skip(client))]
pub async fn load_site_data(source: &str, client: &reqwest::Client) -> Result<SiteData, SiteDataError> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        let response = client.get(source).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SiteDataError::Status {
                url: source.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|source_err| SiteDataError::Io {
                path: source.to_string(),
                source: source_err,
            })?
    };

    let data: SiteData = serde_json::from_str(&body)?;
    tracing::info!(
        scenes = data.gallery_scenes.len(),
        product_details = data.product_details.len(),
        "Loaded site data"
    );
    Ok(data)
}
