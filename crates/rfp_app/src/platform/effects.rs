use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use chrono::Utc;
use rfp_core::{Effect, Field, FormInput, Msg, ProposalOutcome, SimulationStep};
use rfp_engine::{EngineError, EngineEvent, EngineHandle, EventSink, RfpRequest, ScriptStep};
use rfp_logging::{rfp_error, rfp_info, rfp_warn};

use super::config::AppConfig;

/// What the host has to show for effects it cannot hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidForm(Vec<(Field, &'static str)>),
    BriefSaved(PathBuf),
    BriefSaveFailed(String),
}

pub struct EffectRunner {
    engine: EngineHandle,
    download_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { msg_tx });
        let engine = EngineHandle::new(config.engine_settings(), sink)?;
        Ok(Self {
            engine,
            download_dir: config.download_dir.clone(),
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::ReportValidity { errors } => {
                    notices.push(Notice::InvalidForm(errors));
                }
                Effect::ProbeHealth => {
                    rfp_info!("ProbeHealth");
                    self.engine.probe_health();
                }
                Effect::SubmitProposal { input } => {
                    rfp_info!("SubmitProposal company_url={}", input.company_url);
                    self.engine.submit(map_input(input));
                }
                Effect::StartSimulation { steps } => {
                    rfp_info!("StartSimulation steps={}", steps.len());
                    self.engine.simulate(map_steps(steps));
                }
                Effect::DownloadBrief { content } => {
                    let today = Utc::now().date_naive();
                    match rfp_engine::save_brief(&self.download_dir, today, &content) {
                        Ok(path) => notices.push(Notice::BriefSaved(path)),
                        Err(err) => {
                            rfp_error!("Failed to save brief to {:?}: {}", self.download_dir, err);
                            notices.push(Notice::BriefSaveFailed(err.to_string()));
                        }
                    }
                }
            }
        }
        notices
    }
}

/// Forwards engine events into the app's message loop.
struct MsgSink {
    msg_tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if self.msg_tx.send(map_event(event)).is_err() {
            rfp_warn!("message loop is gone; engine event dropped");
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked { available } => Msg::HealthChecked { available },
        EngineEvent::ProposalAccepted { .. } => Msg::ProposalAccepted,
        EngineEvent::ProposalCompleted(response) => {
            let scope_report = response.scope_report().map(str::to_owned);
            Msg::ProposalCompleted(ProposalOutcome {
                deploy_path: response.deploy_path,
                scope_report,
            })
        }
        EngineEvent::ProposalFailed(err) => {
            rfp_warn!("Proposal failed ({}): {}", err.kind, err.message);
            Msg::ProposalFailed {
                message: err.message,
            }
        }
        EngineEvent::SimulationStep {
            index,
            total,
            message,
        } => Msg::SimulationStep {
            index,
            total,
            message,
        },
        EngineEvent::SimulationFinished => Msg::SimulationFinished,
        EngineEvent::SimulationCancelled => {
            rfp_warn!("Simulation cancelled before completion");
            Msg::SimulationCancelled
        }
    }
}

fn map_input(input: FormInput) -> RfpRequest {
    RfpRequest {
        company_url: input.company_url,
        drug_name: input.drug_name,
        trials_papers: input.trials_papers,
        doctor_types: input.doctor_types,
    }
}

fn map_steps(steps: Vec<SimulationStep>) -> Vec<ScriptStep> {
    steps
        .into_iter()
        .map(|step| ScriptStep {
            message: step.message,
            delay: step.delay,
        })
        .collect()
}
