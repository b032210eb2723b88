//! Facebook Graph API publish adapter
//!
//! Uploads a finished clip to a page's `videos` edge as a multipart form.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Production Graph API root
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";

/// Graph API version used when none is configured
pub const DEFAULT_GRAPH_VERSION: &str = "v17.0";

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 300;

/// Facebook page publish adapter
pub struct FacebookPublishAdapter {
    client: reqwest::Client,
    graph_url: String,
    graph_version: String,
    page_id: String,
    page_token: String,
}

impl FacebookPublishAdapter {
    /// Create new adapter for a page
    pub fn new(page_id: String, page_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            graph_version: DEFAULT_GRAPH_VERSION.to_string(),
            page_id,
            page_token,
        }
    }

    /// Point the adapter at another Graph API root or version
    pub fn with_endpoint(mut self, graph_url: String, graph_version: String) -> Self {
        self.graph_url = graph_url.trim_end_matches('/').to_string();
        self.graph_version = graph_version;
        self
    }

    fn videos_url(&self) -> String {
        format!(
            "{}/{}/{}/videos",
            self.graph_url, self.graph_version, self.page_id
        )
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

#[async_trait]
impl PublishPort for FacebookPublishAdapter {
    async fn upload(&self, request: &UploadRequest) -> Result<PublishReceipt, DomainError> {
        let bytes = tokio::fs::read(&request.file_path).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read {}: {}",
                request.file_path.display(),
                e
            ))
        })?;
        let file_name = request
            .file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "clip.mp4".to_string());

        let source = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("video/mp4")
            .map_err(|e| DomainError::InternalError(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new()
            .text("access_token", self.page_token.clone())
            .text("title", request.title.clone())
            .text("description", request.description.clone())
            .part("source", source);

        info!(page_id = %self.page_id, file = %request.file_path.display(), "Uploading clip");
        let resp = self
            .client
            .post(self.videos_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| DomainError::RemoteFail(format!("Upload request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(DomainError::RemoteFail(format!(
                "Upload returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        // Any 2xx means the clip is live, with or without an id
        let body = resp.text().await.unwrap_or_default();
        let post_id = match serde_json::from_str::<UploadResponse>(&body) {
            Ok(response) => response.id.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!(error = %e, "Upload response could not be decoded");
                None
            }
        };
        if post_id.is_none() {
            warn!(
                status = status.as_u16(),
                "Upload accepted without a video id in the response"
            );
        }

        Ok(PublishReceipt { post_id })
    }
}
