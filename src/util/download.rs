//! HTTPS fetch of remote installer scripts.
//!
//! The version-manager installer is downloaded to a scratch file and then
//! handed to the shell. The download itself has no retry; a network
//! failure surfaces as an install failure for the step.

use std::io::Write;

use tempfile::NamedTempFile;
use thiserror::Error;
use url::Url;

/// Failure while fetching a remote script.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid installer URL `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server answered {status} for {url}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to write downloaded script to disk")]
    Io(#[from] std::io::Error),
}

/// Download `url` over HTTPS into a named scratch file.
///
/// The file lives until the returned handle is dropped, long enough for
/// the caller to execute it.
pub fn fetch_script(url: &str) -> Result<NamedTempFile, DownloadError> {
    let parsed = Url::parse(url).map_err(|source| DownloadError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    tracing::debug!("fetching installer from {}", parsed);

    let response = reqwest::blocking::get(parsed.clone()).map_err(|source| {
        DownloadError::Request {
            url: url.to_string(),
            source,
        }
    })?;

    if !response.status().is_success() {
        return Err(DownloadError::BadStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = response.bytes().map_err(|source| DownloadError::Request {
        url: url.to_string(),
        source,
    })?;

    let mut file = NamedTempFile::new()?;
    file.write_all(&body)?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = fetch_script("not a url").unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl { .. }));
    }
}
