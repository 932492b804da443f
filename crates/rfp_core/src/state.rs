use chrono::{NaiveTime, Timelike};

use crate::form::{FormFields, FormInput};
use crate::view_model::{escape_for_display, AppViewModel, BriefModalView, FormView, PanelView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Submitting,
    Running,
    Complete,
    Error,
}

impl RunState {
    pub fn subtitle(self) -> &'static str {
        match self {
            RunState::Idle => "Ready",
            RunState::Submitting => "Submitting",
            RunState::Running => "Agents running",
            RunState::Complete => "Complete",
            RunState::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warn,
    Err,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: NaiveTime,
}

/// Source of activity-log timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Local wall-clock time, truncated to whole seconds.
    #[default]
    System,
    Fixed(NaiveTime),
}

impl Clock {
    pub fn now(self) -> NaiveTime {
        match self {
            Clock::System => {
                let now = chrono::Local::now().time();
                now.with_nanosecond(0).unwrap_or(now)
            }
            Clock::Fixed(time) => time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    fields: FormFields,
    input: Option<FormInput>,
    run: RunState,
    run_active: bool,
    progress: u8,
    log: Vec<LogEntry>,
    panel_open: bool,
    done_visible: bool,
    brief: Option<String>,
    brief_visible: bool,
    clock: Clock,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            form: FormView {
                company_url: self.fields.company_url.clone(),
                drug_name: self.fields.drug_name.clone(),
                trials_papers: self.fields.trials_papers.value.clone(),
                doctor_types: self.fields.doctor_types.value.clone(),
            },
            run: self.run,
            subtitle: self.run.subtitle(),
            progress: self.progress,
            log: self.log.clone(),
            panel: PanelView {
                open: self.panel_open,
                aria_hidden: !self.panel_open,
                backdrop_hidden: !self.panel_open,
                done_visible: self.done_visible,
            },
            brief: BriefModalView {
                visible: self.brief_visible,
                backdrop_hidden: !self.brief_visible,
                content: self.brief.as_deref().map(escape_for_display),
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Request captured by the current or most recent run.
    pub fn input(&self) -> Option<&FormInput> {
        self.input.as_ref()
    }

    /// Verbatim text of the pending brief, if any.
    pub fn brief_document(&self) -> Option<&str> {
        self.brief.as_deref()
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn is_run_active(&self) -> bool {
        self.run_active
    }

    pub(crate) fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub(crate) fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub(crate) fn begin_run(&mut self, input: FormInput) {
        self.input = Some(input);
        self.run_active = true;
        self.progress = 0;
        self.done_visible = false;
        self.mark_dirty();
    }

    /// Terminal step of a run: progress pinned to 100 and the done control shown.
    pub(crate) fn end_run(&mut self, run: RunState) {
        self.run = run;
        self.progress = 100;
        self.done_visible = true;
        self.run_active = false;
        self.mark_dirty();
    }

    pub(crate) fn set_run(&mut self, run: RunState) {
        self.run = run;
        self.mark_dirty();
    }

    pub(crate) fn set_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
        self.mark_dirty();
    }

    pub(crate) fn append_log(&mut self, message: impl Into<String>, severity: Severity) {
        self.log.push(LogEntry {
            message: message.into(),
            severity,
            timestamp: self.clock.now(),
        });
        self.mark_dirty();
    }

    pub(crate) fn open_panel(&mut self) {
        self.panel_open = true;
        self.mark_dirty();
    }

    pub(crate) fn close_panel(&mut self) {
        if self.panel_open {
            self.panel_open = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn show_brief(&mut self, document: String) {
        self.brief = Some(document);
        self.brief_visible = true;
        self.mark_dirty();
    }

    pub(crate) fn close_brief(&mut self) {
        if self.brief_visible {
            self.brief_visible = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
