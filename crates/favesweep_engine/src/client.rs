use serde::Deserialize;

use favesweep_core::MediaKind;

use crate::settings::ServiceSettings;
use crate::traits::{AnalysisService, RemovalService};
use crate::types::{MediaHit, ServiceError};

/// Wire entry returned by the analysis endpoint. The optional `type` tag
/// is decided into a [`MediaKind`] here, at the boundary, so nothing
/// downstream compares strings.
#[derive(Debug, Deserialize)]
struct WireEntry {
    #[serde(default)]
    url: String,
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    media_type: Option<String>,
}

impl WireEntry {
    fn into_hit(self) -> MediaHit {
        let kind = match self.media_type.as_deref() {
            Some("video") => MediaKind::Video,
            _ => MediaKind::Image,
        };
        MediaHit {
            id: self.id,
            url: self.url,
            kind,
        }
    }
}

/// HTTP client for the deep-analysis service.
///
/// POSTs `{ "id": ..., "url": ... }` to `{base}/analyze` and expects a
/// JSON array of entries. The token, when present, rides as a query
/// parameter.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAnalysisClient {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        settings: &ServiceSettings,
    ) -> Result<Self, ServiceError> {
        let base_url = validate_base_url(base_url)?;
        Ok(Self {
            client: build_client(settings)?,
            base_url,
            token: token.map(String::from),
        })
    }

    fn endpoint(&self) -> String {
        service_endpoint(&self.base_url, "analyze", self.token.as_deref())
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, id: &str, url: &str) -> Result<Vec<MediaHit>, ServiceError> {
        let body = serde_json::json!({ "id": id, "url": url });
        let response = post_json(&self.client, self.endpoint(), &body).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload = response.text().await?;
        let entries: Vec<WireEntry> = serde_json::from_str(&payload)
            .map_err(|err| ServiceError::Payload(err.to_string()))?;
        Ok(entries.into_iter().map(WireEntry::into_hit).collect())
    }
}

/// HTTP client for the removal service: POSTs `{ "id": ... }` to
/// `{base}/unfavorite`.
#[derive(Debug, Clone)]
pub struct HttpRemovalClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemovalClient {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        settings: &ServiceSettings,
    ) -> Result<Self, ServiceError> {
        let base_url = validate_base_url(base_url)?;
        Ok(Self {
            client: build_client(settings)?,
            base_url,
            token: token.map(String::from),
        })
    }

    fn endpoint(&self) -> String {
        service_endpoint(&self.base_url, "unfavorite", self.token.as_deref())
    }
}

#[async_trait::async_trait]
impl RemovalService for HttpRemovalClient {
    async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let body = serde_json::json!({ "id": id });
        let response = post_json(&self.client, self.endpoint(), &body).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

async fn post_json(
    client: &reqwest::Client,
    endpoint: String,
    body: &serde_json::Value,
) -> Result<reqwest::Response, ServiceError> {
    let response = client
        .post(endpoint)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .send()
        .await?;
    Ok(response)
}

fn build_client(settings: &ServiceSettings) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| ServiceError::Network(err.to_string()))
}

fn validate_base_url(base_url: &str) -> Result<String, ServiceError> {
    let trimmed = base_url.trim_end_matches('/');
    url::Url::parse(trimmed).map_err(|err| ServiceError::InvalidUrl(err.to_string()))?;
    Ok(trimmed.to_string())
}

fn service_endpoint(base_url: &str, path: &str, token: Option<&str>) -> String {
    let mut endpoint = format!("{base_url}/{path}");
    if let Some(token) = token {
        endpoint.push_str(&format!("?token={token}"));
    }
    endpoint
}
