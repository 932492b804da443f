use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body POSTed to the RFP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfpRequest {
    pub company_url: String,
    pub drug_name: String,
    pub trials_papers: String,
    pub doctor_types: String,
}

/// Consumed subset of the RFP endpoint's response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RfpResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub deploy_path: Option<String>,
    /// Pipeline state; only `scope_report` is read from it.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl RfpResponse {
    /// The generated brief, when the pipeline produced one.
    pub fn scope_report(&self) -> Option<&str> {
        self.result
            .as_ref()?
            .get("scope_report")?
            .as_str()
    }
}

/// One scripted step of the simulated workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub message: String,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HealthChecked { available: bool },
    /// Backend answered with a success status; the body is not parsed yet.
    ProposalAccepted { status: u16 },
    ProposalCompleted(RfpResponse),
    ProposalFailed(ProposalError),
    SimulationStep {
        index: usize,
        total: usize,
        message: String,
    },
    SimulationFinished,
    SimulationCancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProposalError {
    pub kind: FailureKind,
    pub message: String,
}

impl ProposalError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn status(code: u16) -> Self {
        Self::new(FailureKind::HttpStatus(code), format!("Server error {code}"))
    }

    pub(crate) fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "Request cancelled")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
