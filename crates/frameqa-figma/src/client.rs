use std::time::Duration;

use async_trait::async_trait;
use frameqa_core::DocumentNode;
use reqwest::Url;
use tracing::{debug, warn};

use crate::{parse, DesignSource, FigmaError};

pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin REST client. Every call is a single GET bounded by the client
/// timeout; failures are returned, never retried.
#[derive(Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl FigmaClient {
    pub fn new(token: impl Into<String>, api_base: &str, timeout: Duration) -> Result<Self, FigmaError> {
        let base = Url::parse(api_base).map_err(|e| FigmaError::InvalidBase(format!("{api_base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FigmaError::InvalidBase(api_base.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            token: token.into(),
        })
    }

    /// `{base}/files/{file_key}/{tail...}` with each segment percent-encoded.
    pub fn endpoint(&self, file_key: &str, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("files").push(file_key).extend(tail);
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value, FigmaError> {
        debug!(%url, "calling design API");
        let response = self
            .http
            .get(url.clone())
            .header("X-Figma-Token", &self.token)
            .send()
            .await
            .inspect_err(|e| warn!(%url, error = %e, "design API unreachable"))?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let message = parse::error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            warn!(%url, status = status.as_u16(), %message, "design API error");
            return Err(FigmaError::Api {
                status: status.as_u16(),
                message,
            });
        }
        debug!(%url, bytes = body.len(), "design API success");
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DesignSource for FigmaClient {
    async fn node(&self, file_key: &str, node_id: &str) -> Result<Option<DocumentNode>, FigmaError> {
        let mut url = self.endpoint(file_key, &["nodes"]);
        url.query_pairs_mut().append_pair("ids", node_id);
        let body = self.get_json(url).await?;
        Ok(parse::node_document(&body, node_id)?)
    }

    async fn styles(&self, file_key: &str) -> Result<serde_json::Value, FigmaError> {
        self.get_json(self.endpoint(file_key, &["styles"])).await
    }

    async fn local_variables(&self, file_key: &str) -> Result<serde_json::Value, FigmaError> {
        self.get_json(self.endpoint(file_key, &["variables", "local"]))
            .await
    }
}
