//! RFP core: pure controller state machine for the proposal form and its
//! progress panel.
mod effect;
mod form;
mod msg;
mod script;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{
    validate, Field, FieldState, FormFields, FormInput, DRUG_NAME_REQUIRED, INVALID_URL,
};
pub use msg::{Msg, ProposalOutcome};
pub use script::{
    simulation_progress, simulation_script, SimulationStep, SIMULATION_PROGRESS_CAP,
    SIMULATION_START_DELAY,
};
pub use state::{AppState, Clock, LogEntry, RunState, Severity};
pub use update::update;
pub use view_model::{escape_for_display, AppViewModel, BriefModalView, FormView, PanelView};
