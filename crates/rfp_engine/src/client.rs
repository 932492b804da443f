use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use rfp_logging::{rfp_debug, rfp_info, rfp_warn};

use crate::engine::EventSink;
use crate::{EngineEvent, FailureKind, ProposalError, RfpRequest, RfpResponse};

pub const HEALTH_PATH: &str = "/api/health";
pub const RFP_PATH: &str = "/api/rfp";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Origin the `/api/*` paths are appended to.
    pub api_base: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl ClientSettings {
    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ProposalError> {
        let raw = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        reqwest::Url::parse(&raw)
            .map_err(|err| ProposalError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
    }
}

#[async_trait::async_trait]
pub trait ProposalClient: Send + Sync {
    /// True when the health endpoint answered at all, whatever the status.
    async fn probe_health(&self) -> bool;

    /// POSTs the request. Emits `ProposalAccepted` once a success status
    /// arrives, before the body is decoded.
    async fn submit(
        &self,
        request: &RfpRequest,
        sink: &dyn EventSink,
    ) -> Result<RfpResponse, ProposalError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestProposalClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestProposalClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ProposalError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ProposalError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl ProposalClient for ReqwestProposalClient {
    async fn probe_health(&self) -> bool {
        let url = match self.settings.endpoint(HEALTH_PATH) {
            Ok(url) => url,
            Err(err) => {
                rfp_warn!("health probe skipped: {}", err);
                return false;
            }
        };
        match self.client.get(url).send().await {
            Ok(response) => {
                rfp_info!("health probe answered status={}", response.status());
                true
            }
            Err(err) => {
                rfp_debug!("health probe failed: {}", err);
                false
            }
        }
    }

    async fn submit(
        &self,
        request: &RfpRequest,
        sink: &dyn EventSink,
    ) -> Result<RfpResponse, ProposalError> {
        let url = self.settings.endpoint(RFP_PATH)?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ProposalError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            rfp_warn!("rfp submission rejected status={}", status);
            return Err(ProposalError::status(status.as_u16()));
        }
        sink.emit(EngineEvent::ProposalAccepted {
            status: status.as_u16(),
        });

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: RfpResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ProposalError::new(FailureKind::Decode, err.to_string()))?;
        rfp_info!(
            "rfp response ok={:?} deploy_path={:?} report_len={:?}",
            parsed.ok,
            parsed.deploy_path,
            parsed.scope_report().map(str::len)
        );
        Ok(parsed)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProposalError {
    if err.is_timeout() {
        return ProposalError::new(FailureKind::Timeout, err.to_string());
    }
    ProposalError::new(FailureKind::Network, err.to_string())
}
