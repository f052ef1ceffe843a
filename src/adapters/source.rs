use crate::core::DataSource;
use crate::utils::error::{RenderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn parse_payload(source_id: &str, body: &str) -> Result<serde_json::Value> {
    serde_json::from_str(body).map_err(|e| RenderError::MalformedPayload {
        source_id: source_id.to_string(),
        message: e.to_string(),
    })
}

/// Fetches data files over HTTP, resolving locators against a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        Self::with_client(base, Client::new())
    }

    pub fn with_client(base: &str, client: Client) -> Result<Self> {
        // Without a trailing slash `join` would drop the last path segment.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&normalized).map_err(|e| RenderError::InvalidConfigValueError {
            field: "source.base".to_string(),
            value: base.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, source_id: &str) -> Result<serde_json::Value> {
        let url = self
            .base
            .join(source_id)
            .map_err(|e| RenderError::InvalidConfigValueError {
                field: "sections.source".to_string(),
                value: source_id.to_string(),
                reason: format!("Cannot resolve against {}: {}", self.base, e),
            })?;

        tracing::debug!("Making data request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Data response status: {}", status);

        if !status.is_success() {
            return Err(RenderError::StatusError {
                source_id: source_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_payload(source_id, &body)
    }
}

/// Reads data files from a local directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self, source_id: &str) -> Result<serde_json::Value> {
        let path = self.root.join(source_id);
        tracing::debug!("Reading data file: {}", path.display());
        let body = tokio::fs::read_to_string(&path).await?;
        parse_payload(source_id, &body)
    }
}

/// Picks the source for a configured base: http(s) URLs go over the
/// network, anything else is a directory.
pub fn source_for(base: &str, request_timeout: Option<Duration>) -> Result<Arc<dyn DataSource>> {
    if base.starts_with("http://") || base.starts_with("https://") {
        let mut builder = Client::builder();
        if let Some(limit) = request_timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build()?;
        Ok(Arc::new(HttpSource::with_client(base, client)?))
    } else {
        Ok(Arc::new(FileSource::new(base)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_http_source_returns_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/assets/data/events.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{"title": "Summer Fair"}]));
        });

        let source = HttpSource::new(&server.url("/assets")).unwrap();
        let payload = source.fetch("data/events.json").await.unwrap();

        api_mock.assert();
        assert_eq!(payload[0]["title"], "Summer Fair");
    }

    #[tokio::test]
    async fn test_http_source_maps_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/team.json");
            then.status(404);
        });

        let source = HttpSource::new(&server.base_url()).unwrap();
        let err = source.fetch("team.json").await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, RenderError::StatusError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_http_source_rejects_invalid_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/shop.json");
            then.status(200).body("[{\"title\": ");
        });

        let source = HttpSource::new(&server.base_url()).unwrap();
        let err = source.fetch("shop.json").await.unwrap_err();

        assert!(matches!(err, RenderError::MalformedPayload { .. }));
    }

    #[tokio::test]
    async fn test_file_source_reads_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("data")).unwrap();
        std::fs::write(temp_dir.path().join("data/faq.json"), r#"[{"q": "Why?"}]"#).unwrap();

        let source = FileSource::new(temp_dir.path());
        let payload = source.fetch("data/faq.json").await.unwrap();
        assert_eq!(payload[0]["q"], "Why?");

        let err = source.fetch("data/missing.json").await.unwrap_err();
        assert!(matches!(err, RenderError::IoError(_)));
    }

    #[test]
    fn test_http_base_gets_trailing_slash() {
        let source = HttpSource::new("https://example.org/site").unwrap();
        assert_eq!(source.base().as_str(), "https://example.org/site/");
        assert!(HttpSource::new("not a url").is_err());
    }
}
