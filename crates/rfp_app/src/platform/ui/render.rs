use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rfp_core::{AppViewModel, Field, LogEntry, Severity};

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos:>3}% {msg}";

/// Draws the activity panel and brief modal to the terminal.
///
/// Rendering is incremental: log entries already printed are skipped and the
/// modal is drawn once per opening.
#[derive(Default)]
pub struct TerminalRenderer {
    bar: Option<ProgressBar>,
    printed_log: usize,
    modal_open: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) {
        if view.panel.open && self.bar.is_none() {
            println!("{}", style("Activity").bold());
            self.bar = Some(new_bar());
        }

        if let Some(bar) = &self.bar {
            let pending = &view.log[self.printed_log.min(view.log.len())..];
            if !pending.is_empty() {
                bar.suspend(|| {
                    for entry in pending {
                        println!("{}", format_log_line(entry));
                    }
                });
                self.printed_log = view.log.len();
            }
            bar.set_position(u64::from(view.progress));
            bar.set_message(view.subtitle);
        }

        match (&view.brief.content, view.brief.visible, self.modal_open) {
            (Some(content), true, false) => {
                self.modal_open = true;
                let frame = format_modal(content);
                match &self.bar {
                    Some(bar) => bar.suspend(|| println!("{frame}")),
                    None => println!("{frame}"),
                }
            }
            (_, false, true) => self.modal_open = false,
            _ => {}
        }

        if !view.panel.open {
            if let Some(bar) = self.bar.take() {
                bar.finish();
            }
        }
    }

    pub fn report_validity(&self, errors: &[(Field, &'static str)]) {
        for line in format_validity(errors) {
            eprintln!("{}", style(line).red());
        }
    }

    pub fn notice(&self, text: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{text}")),
            None => println!("{text}"),
        }
    }
}

fn new_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    if let Ok(bar_style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(bar_style.progress_chars("█▓░"));
    }
    bar
}

fn format_log_line(entry: &LogEntry) -> String {
    let dot = match entry.severity {
        Severity::Ok => style("●").green(),
        Severity::Warn => style("●").yellow(),
        Severity::Err => style("●").red(),
    };
    format!(
        "{dot} {message}  {time}",
        message = entry.message,
        time = style(entry.timestamp.format("%H:%M:%S")).dim()
    )
}

fn format_modal(content: &str) -> String {
    let rule = "─".repeat(60);
    format!(
        "{rule}\n{title}\n{rule}\n{content}\n{rule}",
        title = style("Marketing brief").bold()
    )
}

fn format_validity(errors: &[(Field, &'static str)]) -> Vec<String> {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field.id(), message))
        .collect()
}
