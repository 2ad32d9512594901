//! Downloading remote images to disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Name used when neither the caller nor the URL provide one.
const FALLBACK_NAME: &str = "download";

/// Download errors.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Resource URL not provided! You need to provide one")]
    MissingUrl,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {status} fetching {url}")]
    Status { status: u16, url: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the file name a download is saved under.
///
/// A non-empty `filename` becomes `<filename>.png` with spaces replaced by
/// underscores. Otherwise the last path segment of `url` is used. Directory
/// components are stripped from either source, so the result never leaves
/// the target directory.
pub fn file_name_for(url: &str, filename: &str) -> String {
    if let Some(name) = last_component(filename) {
        return format!("{}.png", name.replace(' ', "_"));
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.contains(':'))
        .and_then(last_component)
        .unwrap_or(FALLBACK_NAME);

    if segment.contains('.') {
        segment.to_string()
    } else {
        format!("{segment}.png")
    }
}

/// Returns the final path component of `name`, or `None` when nothing usable
/// remains (empty, `.` or `..`).
fn last_component(name: &str) -> Option<&str> {
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match name {
        "" | "." | ".." => None,
        _ if name.contains('\0') => None,
        _ => Some(name),
    }
}

/// Fetches `url` and writes the body into `dir`. Returns the written path.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    filename: &str,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DownloadError::MissingUrl);
    }

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let bytes = response.bytes().await?;

    let path = dir.join(file_name_for(url, filename));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| DownloadError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(url = %url, path = %path.display(), bytes = bytes.len(), "Downloaded file");
    Ok(path)
}
