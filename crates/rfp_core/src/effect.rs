use crate::{Field, FormInput, SimulationStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Validation failed; the host surfaces the inline errors.
    ReportValidity {
        errors: Vec<(Field, &'static str)>,
    },
    /// Probe the backend health endpoint; answer with `Msg::HealthChecked`.
    ProbeHealth,
    /// POST the captured request to the backend.
    SubmitProposal { input: FormInput },
    /// Run the scripted demo workflow, one step at a time.
    StartSimulation { steps: Vec<SimulationStep> },
    /// Save the verbatim brief text.
    DownloadBrief { content: String },
}
