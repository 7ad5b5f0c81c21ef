//! HTTP access to the POS API

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{Envelope, JobId, PrintJob, PrinterRecord, StoreConfig};
use std::time::Duration;

/// Remote operations the print agent depends on
#[async_trait]
pub trait PosApi: Send + Sync {
    /// All jobs currently pending on the print queue, in queue order
    async fn pending_jobs(&self) -> ClientResult<Vec<PrintJob>>;

    /// Acknowledge a printed job; acknowledging twice is harmless
    async fn mark_complete(&self, id: &JobId) -> ClientResult<()>;

    /// The configured printer registry
    async fn printers(&self) -> ClientResult<Vec<PrinterRecord>>;

    /// Store decoration for tickets
    async fn ticket_config(&self) -> ClientResult<StoreConfig>;
}

/// Network client for the POS API
#[derive(Debug, Clone)]
pub struct HttpPosApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPosApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut req = self.client.get(self.url(path));
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = Self::check_status(req.send().await?).await?;
        let text = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", path, e)))?;
        Ok(envelope.into_inner())
    }

    async fn post_empty(&self, path: &str) -> ClientResult<()> {
        let mut req = self.client.post(self.url(path));
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        Self::check_status(req.send().await?).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ClientError::Validation(text))
            }
            _ => Err(ClientError::Internal(format!("{}: {}", status, text))),
        }
    }
}

#[async_trait]
impl PosApi for HttpPosApi {
    async fn pending_jobs(&self) -> ClientResult<Vec<PrintJob>> {
        let raw: Vec<serde_json::Value> = self.get("impresion/pendientes").await?;

        // One malformed entry must not hide the rest of the queue
        let jobs = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<PrintJob>(value) {
                Ok(job) => Some(job),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed print job entry");
                    None
                }
            })
            .collect();
        Ok(jobs)
    }

    async fn mark_complete(&self, id: &JobId) -> ClientResult<()> {
        match self.post_empty(&format!("impresion/marcar/{}", id)).await {
            // Already cleared by an earlier acknowledgment
            Err(ClientError::NotFound(_)) => {
                tracing::debug!(job_id = %id, "Job already acknowledged");
                Ok(())
            }
            result => result,
        }
    }

    async fn printers(&self) -> ClientResult<Vec<PrinterRecord>> {
        let raw: Vec<serde_json::Value> = self.get("impresoras").await?;

        // A bad record only takes its own printer out of the registry
        let records = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<PrinterRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed printer record");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    async fn ticket_config(&self) -> ClientResult<StoreConfig> {
        self.get("configuracion-ticket").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = HttpPosApi::new(&ClientConfig::new("http://pos.local/api/")).unwrap();
        assert_eq!(api.base_url(), "http://pos.local/api");
        assert_eq!(api.url("impresoras"), "http://pos.local/api/impresoras");
        assert_eq!(api.url("/impresoras"), "http://pos.local/api/impresoras");
    }

    #[test]
    fn test_auth_header() {
        let api = HttpPosApi::new(&ClientConfig::default()).unwrap();
        assert!(api.auth_header().is_none());

        let api = HttpPosApi::new(&ClientConfig::default().with_token("abc")).unwrap();
        assert_eq!(api.auth_header().as_deref(), Some("Bearer abc"));
    }
}
