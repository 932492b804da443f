use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use rfp_logging::{rfp_debug, rfp_info, rfp_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, ProposalClient, ReqwestProposalClient};
use crate::simulate::run_script;
use crate::{EngineEvent, ProposalError, RfpRequest, ScriptStep};

/// Receiver of engine events; called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// No defaults here: the start delay belongs to the simulation script and
/// the host passes it in alongside the client settings.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub client: ClientSettings,
    /// Pause between choosing the simulated branch and its first step.
    pub simulation_start_delay: Duration,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ProposalError),
}

enum EngineCommand {
    ProbeHealth,
    Submit(RfpRequest),
    Simulate(Vec<ScriptStep>),
}

/// Runs backend requests and simulations on a dedicated runtime thread and
/// reports progress through an [`EventSink`].
///
/// Every command observes the handle's cancellation token. Nothing in the
/// controller cancels a run, but the token is there for hosts that need to.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = ReqwestProposalClient::new(settings.client.clone())?;
        Self::with_client(settings, Arc::new(client), sink)
    }

    pub fn with_client(
        settings: EngineSettings,
        client: Arc<dyn ProposalClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let start_delay = settings.simulation_start_delay;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let sink = sink.clone();
                let cancel = worker_cancel.child_token();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, start_delay, &cancel, sink.as_ref())
                        .await;
                });
            }
            rfp_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx, cancel })
    }

    pub fn probe_health(&self) {
        self.send(EngineCommand::ProbeHealth);
    }

    pub fn submit(&self, request: RfpRequest) {
        self.send(EngineCommand::Submit(request));
    }

    pub fn simulate(&self, steps: Vec<ScriptStep>) {
        self.send(EngineCommand::Simulate(steps));
    }

    /// Token shared by every command issued through this handle.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops in-flight and future commands.
    pub fn cancel(&self) {
        rfp_info!("engine cancellation requested");
        self.cancel.cancel();
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            rfp_warn!("engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    client: &dyn ProposalClient,
    command: EngineCommand,
    start_delay: Duration,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::ProbeHealth => {
            let available = tokio::select! {
                biased;
                _ = cancel.cancelled() => false,
                available = client.probe_health() => available,
            };
            sink.emit(EngineEvent::HealthChecked { available });
        }
        EngineCommand::Submit(request) => {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ProposalError::cancelled()),
                result = client.submit(&request, sink) => result,
            };
            match result {
                Ok(response) => sink.emit(EngineEvent::ProposalCompleted(response)),
                Err(err) => {
                    rfp_warn!("rfp submission failed: {} ({})", err, err.kind);
                    sink.emit(EngineEvent::ProposalFailed(err));
                }
            }
        }
        EngineCommand::Simulate(steps) => {
            run_script(&steps, start_delay, cancel, sink).await;
        }
    }
}
