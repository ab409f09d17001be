//! HTTP implementation of the notes service contract

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiSchema, NotesApi};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{Document, DocumentId, NewDocument};

/// Notes service client over HTTP
#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    http: reqwest::Client,
    base_url: Url,
    schema: ApiSchema,
}

impl HttpNotesApi {
    /// Create a client for the server at `base_url`
    ///
    /// The base URL may carry a path prefix (`https://host/api`); endpoint
    /// paths are appended to it.
    pub fn new(base_url: &str, schema: ApiSchema) -> ApiResult<Self> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an http:// or https:// address".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("vault/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: parsed,
            schema,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(&config.base_url, config.schema())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn schema(&self) -> ApiSchema {
        self.schema
    }

    /// Build an endpoint URL, percent-encoding each segment
    ///
    /// Empty, `.` and `..` segments are rejected: URL path normalization
    /// drops them (encoded or not), which would address another endpoint.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|s| matches!(**s, "" | "." | ".."))
        {
            return Err(ApiError::InvalidPathSegment {
                segment: segment.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        // Checked in new(): the base URL can always take path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and reject non-success statuses
    async fn send(&self, request: RequestBuilder, url: &Url) -> ApiResult<Response> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!("GET {}", url);
        let response = self.send(self.http.get(url.clone()), &url).await?;

        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait(?Send)]
impl NotesApi for HttpNotesApi {
    async fn list_collections(&self) -> ApiResult<Vec<String>> {
        self.get_json(self.endpoint(&["collections"])?).await
    }

    async fn list_documents(&self, collection: &str) -> ApiResult<Vec<Document>> {
        let url = self.endpoint(&[self.schema.route.segment(), collection])?;
        self.get_json(url).await
    }

    async fn add_document(&self, collection: &str, document: &NewDocument) -> ApiResult<()> {
        let url = self.endpoint(&["add", collection])?;
        debug!("POST {}", url);

        let request = self
            .http
            .post(url.clone())
            .json(&document.to_json(self.schema.fields));
        self.send(request, &url).await?;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &DocumentId) -> ApiResult<()> {
        let url = self.endpoint(&["delete", collection, id.as_str()])?;
        debug!("DELETE {}", url);

        self.send(self.http.delete(url.clone()), &url).await?;
        Ok(())
    }
}
