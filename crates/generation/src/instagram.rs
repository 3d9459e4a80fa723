//! Fetches a source video URL from an Instagram post via a third-party
//! resolver, for use as video-to-video transformation input.

use serde::Deserialize;
use thiserror::Error;

/// Resolver endpoint. Takes the post URL as a query parameter and answers
/// with a direct video URL.
pub const DEFAULT_RESOLVER: &str = "https://insta-dl.hazex.workers.dev/";

/// Errors from resolving an Instagram post.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download service returned {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode download response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct InstagramDownloader {
    resolver: String,
    client: reqwest::Client,
}

impl InstagramDownloader {
    pub fn new() -> Self {
        Self::with_resolver(DEFAULT_RESOLVER.to_string())
    }

    pub fn with_resolver(resolver: String) -> Self {
        Self {
            resolver,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a post URL to a direct video URL. No retry; callers decide
    /// whether to surface the failure or just log it.
    pub async fn download(&self, post_url: &str) -> Result<String, DownloadError> {
        let response = self
            .client
            .get(&self.resolver)
            .query(&[("url", post_url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status));
        }

        let body = response.text().await?;
        let parsed: ResolverResponse = serde_json::from_str(&body)?;
        Ok(parsed.result.url)
    }
}

impl Default for InstagramDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ResolverResponse {
    result: ResolverResult,
}

#[derive(Debug, Deserialize)]
struct ResolverResult {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_response_decoding() {
        let body = r#"{"result":{"url":"https://cdn.example.com/reel.mp4"}}"#;
        let parsed: ResolverResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.url, "https://cdn.example.com/reel.mp4");
    }

    #[test]
    fn test_missing_result_url_is_a_decode_error() {
        let err = serde_json::from_str::<ResolverResponse>(r#"{"status":"ok"}"#).unwrap_err();
        let err: DownloadError = err.into();
        assert!(matches!(err, DownloadError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_resolver_is_http_error() {
        let downloader =
            InstagramDownloader::with_resolver("http://127.0.0.1:9/".to_string());
        let err = downloader
            .download("https://www.instagram.com/reel/abc123/")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Http(_)));
    }

    #[tokio::test]
    async fn test_failed_download_leaves_form_source_unset() {
        use crate::request::{MediaKind, RequestForm};

        let downloader =
            InstagramDownloader::with_resolver("http://127.0.0.1:9/".to_string());
        let mut form = RequestForm::new(MediaKind::Video);
        if let Ok(url) = downloader
            .download("https://www.instagram.com/reel/abc123/")
            .await
        {
            form.source_video = Some(url);
        }
        assert!(form.source_video.is_none());
    }
}
