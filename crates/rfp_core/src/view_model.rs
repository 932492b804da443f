use std::fmt::Write;

use crate::{FieldState, LogEntry, RunState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub form: FormView,
    pub run: RunState,
    pub subtitle: &'static str,
    pub progress: u8,
    pub log: Vec<LogEntry>,
    pub panel: PanelView,
    pub brief: BriefModalView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub company_url: FieldState,
    pub drug_name: FieldState,
    pub trials_papers: String,
    pub doctor_types: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelView {
    pub open: bool,
    pub aria_hidden: bool,
    pub backdrop_hidden: bool,
    pub done_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BriefModalView {
    pub visible: bool,
    pub backdrop_hidden: bool,
    /// Escaped brief text, safe to print as-is.
    pub content: Option<String>,
}

/// Neutralises control characters so brief text cannot drive the terminal
/// (cursor moves, colours, title changes). Newlines and tabs pass through.
pub fn escape_for_display(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            let _ = write!(out, "{}", c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
