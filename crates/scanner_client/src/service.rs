use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use scanner_logging::scanner_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::types::{EmailRequest, ErrorBody};
use crate::{
    AnalyzeRequest, EmailConfigResponse, FailureKind, HealthResponse, JobHandle,
    JobResultsResponse, JobStatusResponse, ServiceError,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// The Analysis Service endpoints this client consumes.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<JobHandle, ServiceError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ServiceError>;

    async fn job_results(&self, job_id: &str) -> Result<JobResultsResponse, ServiceError>;

    async fn recipients(&self) -> Result<EmailConfigResponse, ServiceError>;

    async fn add_recipient(&self, email: &str) -> Result<(), ServiceError>;

    async fn remove_recipient(&self, email: &str) -> Result<(), ServiceError>;

    async fn health(&self) -> Result<HealthResponse, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpAnalysisService {
    pub fn new(settings: &ClientSettings) -> Result<Self, ServiceError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ServiceError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::new(
                FailureKind::InvalidBaseUrl,
                format!("{base_url} cannot carry a path"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Setup, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::new(FailureKind::InvalidBaseUrl, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        scanner_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.post(url, body).await?;
        read_json(response).await
    }

    /// Posts a command whose 2xx reply carries nothing the client needs.
    async fn post_command<B>(&self, url: Url, body: &B) -> Result<(), ServiceError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let response = self.post(url, body).await?;
        read_status(response).await
    }

    async fn post<B>(&self, url: Url, body: &B) -> Result<reqwest::Response, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
    {
        scanner_debug!("POST {}", url);
        let payload = serde_json::to_vec(body)
            .map_err(|err| ServiceError::new(FailureKind::Validation, err.to_string()))?;
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<JobHandle, ServiceError> {
        let url = self.endpoint(&["api", "analyze"])?;
        self.post_json(url, request).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ServiceError> {
        let url = self.endpoint(&["api", "status", job_id])?;
        self.get_json(url).await
    }

    async fn job_results(&self, job_id: &str) -> Result<JobResultsResponse, ServiceError> {
        let url = self.endpoint(&["api", "results", job_id])?;
        self.get_json(url).await
    }

    async fn recipients(&self) -> Result<EmailConfigResponse, ServiceError> {
        let url = self.endpoint(&["api", "email-config"])?;
        self.get_json(url).await
    }

    async fn add_recipient(&self, email: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["api", "email-config", "add"])?;
        self.post_command(url, &EmailRequest { email }).await
    }

    async fn remove_recipient(&self, email: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["api", "email-config", "remove"])?;
        self.post_command(url, &EmailRequest { email }).await
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let url = self.endpoint(&["api", "health"])?;
        self.get_json(url).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    serde_json::from_slice(&body).map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
}

/// Success is the status alone; the body is only read for the `error` field.
async fn read_status(response: reqwest::Response) -> Result<(), ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    Err(status_error(status, &body))
}

fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ServiceError {
    let server_error = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error);
    ServiceError::new(
        FailureKind::HttpStatus {
            status: status.as_u16(),
            server_error,
        },
        status.to_string(),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
