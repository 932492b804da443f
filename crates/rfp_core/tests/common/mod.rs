#![allow(dead_code)]

use std::sync::Once;

use chrono::NaiveTime;
use rfp_core::{update, AppState, Clock, Effect, Field, Msg, Severity};

pub const COMPANY_URL: &str = "https://acme-bio.example";
pub const DRUG_NAME: &str = "Zentravix";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rfp_logging::initialize_for_tests);
}

pub fn fixed_state() -> AppState {
    AppState::with_clock(Clock::Fixed(NaiveTime::from_hms_opt(9, 30, 0).unwrap()))
}

pub fn fill_form(mut state: AppState, url: &str, drug: &str) -> AppState {
    for (field, value) in [
        (Field::CompanyUrl, url),
        (Field::DrugName, drug),
        (Field::TrialsPapers, "NCT04512345"),
        (Field::DoctorTypes, "oncologists"),
    ] {
        let (next, effects) = update(
            state,
            Msg::FieldChanged {
                field,
                value: value.to_string(),
            },
        );
        assert!(effects.is_empty());
        state = next;
    }
    state
}

/// Fills a valid form and submits it, returning the state waiting on the probe.
pub fn submitted() -> AppState {
    let state = fill_form(fixed_state(), COMPANY_URL, DRUG_NAME);
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects, vec![Effect::ProbeHealth]);
    state
}

pub fn apply(state: AppState, msgs: impl IntoIterator<Item = Msg>) -> AppState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

pub fn log_messages(state: &AppState) -> Vec<String> {
    state.view().log.into_iter().map(|entry| entry.message).collect()
}

pub fn last_severity(state: &AppState) -> Option<Severity> {
    state.view().log.last().map(|entry| entry.severity)
}
