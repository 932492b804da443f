use crate::Field;

/// Fields of a successful backend response that the controller consumes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProposalOutcome {
    pub deploy_path: Option<String>,
    pub scope_report: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited one of the form fields.
    FieldChanged { field: Field, value: String },
    /// User submitted the form.
    SubmitClicked,
    /// Health probe finished; `available` selects live or simulated run.
    HealthChecked { available: bool },
    /// Backend answered the RFP with a success status.
    ProposalAccepted,
    /// Backend response body was parsed.
    ProposalCompleted(ProposalOutcome),
    /// Live request failed (status, transport or decode).
    ProposalFailed { message: String },
    /// A simulated step became current.
    SimulationStep {
        index: usize,
        total: usize,
        message: String,
    },
    /// All simulated steps have run.
    SimulationFinished,
    /// The simulation stopped before its last step.
    SimulationCancelled,
    PanelCloseClicked,
    PanelDoneClicked,
    PanelBackdropClicked,
    BriefModalCloseClicked,
    BriefCloseClicked,
    BriefBackdropClicked,
    BriefDownloadClicked,
}
