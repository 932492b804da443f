use rfp_logging::{rfp_debug, rfp_info};

use crate::{
    simulation_progress, simulation_script, validate, AppState, Effect, Msg, ProposalOutcome,
    RunState, Severity,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FieldChanged { field, value } => {
            state.fields_mut().set(field, value);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::HealthChecked { available } => {
            if !state.is_run_active() {
                return (state, Vec::new());
            }
            // `input` is always set while a run is active.
            let Some(input) = state.input().cloned() else {
                return (state, Vec::new());
            };
            if available {
                state.append_log("Sending RFP to server…", Severity::Ok);
                state.set_run(RunState::Submitting);
                state.set_progress(5);
                vec![Effect::SubmitProposal { input }]
            } else {
                rfp_debug!("health probe failed, running simulation");
                state.append_log("Agents initialized. Starting workflow…", Severity::Ok);
                state.set_run(RunState::Running);
                vec![Effect::StartSimulation {
                    steps: simulation_script(&input),
                }]
            }
        }
        Msg::ProposalAccepted => {
            if state.is_run_active() {
                state.set_run(RunState::Running);
                state.set_progress(25);
            }
            Vec::new()
        }
        Msg::ProposalCompleted(outcome) => {
            if state.is_run_active() {
                complete_proposal(&mut state, outcome);
            }
            Vec::new()
        }
        Msg::ProposalFailed { message } => {
            if state.is_run_active() {
                state.append_log(format!("Error: {message}"), Severity::Err);
                state.end_run(RunState::Error);
            }
            Vec::new()
        }
        Msg::SimulationStep {
            index,
            total,
            message,
        } => {
            if state.is_run_active() {
                state.set_progress(simulation_progress(index, total));
                state.append_log(message, Severity::Ok);
            }
            Vec::new()
        }
        Msg::SimulationFinished => {
            if state.is_run_active() {
                state.append_log(
                    "Proposal ready (demo). No data was sent to a server.",
                    Severity::Ok,
                );
                state.end_run(RunState::Complete);
            }
            Vec::new()
        }
        Msg::SimulationCancelled => {
            if state.is_run_active() {
                state.append_log("Error: workflow cancelled", Severity::Err);
                state.end_run(RunState::Error);
            }
            Vec::new()
        }
        Msg::PanelCloseClicked | Msg::PanelDoneClicked | Msg::PanelBackdropClicked => {
            state.close_panel();
            Vec::new()
        }
        Msg::BriefModalCloseClicked | Msg::BriefCloseClicked | Msg::BriefBackdropClicked => {
            state.close_brief();
            Vec::new()
        }
        Msg::BriefDownloadClicked => match state.brief_document() {
            Some(content) => vec![Effect::DownloadBrief {
                content: content.to_string(),
            }],
            None => Vec::new(),
        },
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // Runs are never cancelled; a second submission waits for the first.
    if state.is_run_active() {
        rfp_debug!("submit ignored while a run is active");
        return Vec::new();
    }

    let valid = validate(state.fields_mut());
    state.mark_dirty();
    if !valid {
        return vec![Effect::ReportValidity {
            errors: state.fields().errors(),
        }];
    }

    let input = state.fields().capture();
    rfp_info!(
        "submitting proposal company_url={} drug_len={}",
        input.company_url,
        input.drug_name.len()
    );
    state.begin_run(input);
    state.open_panel();
    vec![Effect::ProbeHealth]
}

fn complete_proposal(state: &mut AppState, outcome: ProposalOutcome) {
    state.append_log("Pipeline completed.", Severity::Ok);
    if let Some(path) = outcome.deploy_path.filter(|path| !path.is_empty()) {
        state.append_log(format!("Deployed artifact at: {path}"), Severity::Ok);
    }
    state.set_progress(90);
    state.set_run(RunState::Complete);

    // An empty report counts as missing.
    match outcome.scope_report.filter(|report| !report.is_empty()) {
        Some(report) => {
            state.append_log("Marketing brief ready. Opening preview…", Severity::Ok);
            state.show_brief(report);
        }
        None => {
            state.append_log(
                "Warning: No marketing brief found in response",
                Severity::Warn,
            );
        }
    }

    state.end_run(RunState::Complete);
}
