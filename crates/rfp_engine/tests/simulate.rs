use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use rfp_engine::{run_script, EngineEvent, EventSink, ScriptStep};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Default, Clone)]
struct TimedSink {
    events: Arc<Mutex<Vec<(Duration, EngineEvent)>>>,
    start: Arc<Mutex<Option<Instant>>>,
}

impl TimedSink {
    fn begin(&self) {
        *self.start.lock().unwrap() = Some(Instant::now());
    }

    fn take(&self) -> Vec<(Duration, EngineEvent)> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TimedSink {
    fn emit(&self, event: EngineEvent) {
        let start = self.start.lock().unwrap().expect("begin() first");
        self.events
            .lock()
            .unwrap()
            .push((Instant::now() - start, event));
    }
}

fn steps() -> Vec<ScriptStep> {
    [("crawl", 900), ("resolve", 900), ("scrape", 1000)]
        .into_iter()
        .map(|(message, ms)| ScriptStep {
            message: message.to_string(),
            delay: Duration::from_millis(ms),
        })
        .collect()
}

fn step(index: usize, message: &str) -> EngineEvent {
    EngineEvent::SimulationStep {
        index,
        total: 3,
        message: message.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn steps_run_sequentially_on_their_delays() {
    let sink = TimedSink::default();
    sink.begin();

    let finished = run_script(
        &steps(),
        Duration::from_millis(350),
        &CancellationToken::new(),
        &sink,
    )
    .await;

    assert!(finished);
    assert_eq!(
        sink.take(),
        vec![
            (Duration::from_millis(350), step(0, "crawl")),
            (Duration::from_millis(1250), step(1, "resolve")),
            (Duration::from_millis(2150), step(2, "scrape")),
            (Duration::from_millis(3150), EngineEvent::SimulationFinished),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_remaining_steps() {
    let sink = TimedSink::default();
    sink.begin();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        trigger.cancel();
    });
    let finished = run_script(&steps(), Duration::from_millis(350), &cancel, &sink).await;

    assert!(!finished);
    let events: Vec<EngineEvent> = sink.take().into_iter().map(|(_, e)| e).collect();
    assert_eq!(
        events,
        vec![step(0, "crawl"), EngineEvent::SimulationCancelled]
    );
}

#[tokio::test(start_paused = true)]
async fn empty_script_finishes_after_start_delay() {
    let sink = TimedSink::default();
    sink.begin();

    assert!(run_script(&[], Duration::from_millis(350), &CancellationToken::new(), &sink).await);
    assert_eq!(
        sink.take(),
        vec![(Duration::from_millis(350), EngineEvent::SimulationFinished)]
    );
}
