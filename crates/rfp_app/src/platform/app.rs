use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use rfp_core::{update, AppState, AppViewModel, Effect, Field, Msg, RunState};
use rfp_logging::{rfp_error, rfp_info};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::{EffectRunner, Notice};
use super::logging;
use super::ui::render::TerminalRenderer;

const EXIT_INVALID_FORM: u8 = 2;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Complete,
    Failed,
    InvalidForm,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Complete => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
            Outcome::InvalidForm => ExitCode::from(EXIT_INVALID_FORM),
        }
    }
}

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    logging::initialize(&config, cli.verbose);
    let (config_path, _) = AppConfig::path_from_cli(&cli);
    rfp_info!(
        "config {:?} api_base={} download_dir={:?}",
        config_path,
        config.api_base,
        config.download_dir
    );

    let Some(fields) = cli.form_fields() else {
        rfp_info!("no proposal form supplied; nothing to do");
        return Ok(ExitCode::SUCCESS);
    };

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx).context("starting engine")?;
    let outcome = run_session(&runner, &msg_rx, fields, config.auto_download)?;
    Ok(outcome.into())
}

/// Submits the filled form and pumps engine messages until the run ends.
///
/// `msg_rx` must be the receiving end of the channel the runner's engine
/// reports into; once every sender is gone the session errors out.
fn run_session(
    runner: &EffectRunner,
    msg_rx: &mpsc::Receiver<Msg>,
    fields: Vec<(Field, String)>,
    download: bool,
) -> anyhow::Result<Outcome> {
    let mut session = Session::new(TerminalRenderer::new());

    for (field, value) in fields {
        session.dispatch(Msg::FieldChanged { field, value });
    }
    let mut effects = session.dispatch(Msg::SubmitClicked);

    loop {
        for notice in runner.enqueue(std::mem::take(&mut effects)) {
            if let Notice::InvalidForm(errors) = notice {
                session.renderer.report_validity(&errors);
                return Ok(Outcome::InvalidForm);
            }
            session.show(notice);
        }

        if session.run_finished() {
            return Ok(finish(&mut session, runner, download));
        }

        let msg = msg_rx
            .recv()
            .context("engine stopped before the run finished")?;
        effects = session.dispatch(msg);
    }
}

/// Post-run clicks a user would make: download the brief if asked, close
/// the modal, press done.
fn finish(session: &mut Session, runner: &EffectRunner, download: bool) -> Outcome {
    if session.view().brief.visible {
        if download {
            let effects = session.dispatch(Msg::BriefDownloadClicked);
            for notice in runner.enqueue(effects) {
                session.show(notice);
            }
        }
        session.dispatch(Msg::BriefCloseClicked);
    }
    session.dispatch(Msg::PanelDoneClicked);

    match session.state.run_state() {
        RunState::Complete => Outcome::Complete,
        _ => Outcome::Failed,
    }
}

struct Session {
    state: AppState,
    renderer: TerminalRenderer,
    submitted: bool,
}

impl Session {
    fn new(renderer: TerminalRenderer) -> Self {
        Self {
            state: AppState::new(),
            renderer,
            submitted: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if effects.contains(&Effect::ProbeHealth) {
            self.submitted = true;
        }
        if state.consume_dirty() {
            self.renderer.render(&state.view());
        }
        self.state = state;
        effects
    }

    fn show(&self, notice: Notice) {
        match notice {
            Notice::BriefSaved(path) => {
                self.renderer
                    .notice(&format!("Saved brief to {}", path.display()));
            }
            Notice::BriefSaveFailed(reason) => {
                rfp_error!("brief download failed: {}", reason);
                self.renderer
                    .notice(&format!("Could not save brief: {reason}"));
            }
            Notice::InvalidForm(errors) => self.renderer.report_validity(&errors),
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// A run was started and has reached its terminal state.
    fn run_finished(&self) -> bool {
        self.submitted && !self.state.is_run_active() && self.view().panel.done_visible
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn form(company_url: &str) -> Vec<(Field, String)> {
        vec![
            (Field::CompanyUrl, company_url.to_string()),
            (Field::DrugName, "Zentravix".to_string()),
            (Field::TrialsPapers, "NCT04512345".to_string()),
            (Field::DoctorTypes, "oncologists".to_string()),
        ]
    }

    fn config(api_base: &str, download_dir: &Path) -> AppConfig {
        AppConfig {
            api_base: api_base.to_string(),
            download_dir: download_dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    fn run_blocking(
        config: AppConfig,
        fields: Vec<(Field, String)>,
        download: bool,
    ) -> anyhow::Result<Outcome> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(&config, msg_tx)?;
        run_session(&runner, &msg_rx, fields, download)
    }

    /// The session blocks on a std channel, so it runs off the async workers
    /// that serve the mock backend.
    async fn run(config: AppConfig, download: bool) -> anyhow::Result<Outcome> {
        let fields = form("https://acme-bio.example");
        tokio::task::spawn_blocking(move || run_blocking(config, fields, download))
            .await
            .expect("session thread")
    }

    async fn backend(rfp: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/rfp"))
            .respond_with(rfp)
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn saved_briefs(dir: &Path) -> Vec<String> {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn invalid_form_stops_before_any_request() {
        let temp = TempDir::new().unwrap();
        let outcome =
            run_blocking(config(UNREACHABLE, temp.path()), form("not a url"), false).unwrap();

        assert_eq!(outcome, Outcome::InvalidForm);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn live_brief_completes_and_downloads() {
        let report = "# Brief\n\nReach oncologists first.\n";
        let server = backend(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "deploy_path": "/srv/deploy_output.md",
            "result": { "scope_report": report }
        })))
        .await;
        let temp = TempDir::new().unwrap();
        let downloads = temp.path().join("downloads");

        let outcome = run(config(&server.uri(), &downloads), true).await.unwrap();

        assert_eq!(outcome, Outcome::Complete);
        let files = saved_briefs(&downloads);
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("marketing-brief-"));
        assert!(files[0].ends_with(".md"));
        assert_eq!(fs::read_to_string(downloads.join(&files[0])).unwrap(), report);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn brief_is_not_saved_unless_asked() {
        let server = backend(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "scope_report": "# Brief\n" }
        })))
        .await;
        let temp = TempDir::new().unwrap();
        let downloads = temp.path().join("downloads");

        let outcome = run(config(&server.uri(), &downloads), false).await.unwrap();

        assert_eq!(outcome, Outcome::Complete);
        assert!(saved_briefs(&downloads).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn server_error_fails_the_session() {
        let server = backend(ResponseTemplate::new(500)).await;
        let temp = TempDir::new().unwrap();

        let outcome = run(config(&server.uri(), temp.path()), true).await.unwrap();

        assert_eq!(outcome, Outcome::Failed);
    }

    #[test]
    fn closed_channel_ends_session_with_error() {
        let temp = TempDir::new().unwrap();
        let (engine_tx, _engine_rx) = mpsc::channel();
        let runner = EffectRunner::new(&config(UNREACHABLE, temp.path()), engine_tx).unwrap();
        let (loop_tx, loop_rx) = mpsc::channel::<Msg>();
        drop(loop_tx);

        let err = run_session(&runner, &loop_rx, form("https://acme-bio.example"), false)
            .unwrap_err();

        assert_eq!(err.to_string(), "engine stopped before the run finished");
    }
}
