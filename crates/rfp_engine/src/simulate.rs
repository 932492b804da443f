use std::time::Duration;

use rfp_logging::{rfp_debug, rfp_info};
use tokio_util::sync::CancellationToken;

use crate::engine::EventSink;
use crate::{EngineEvent, ScriptStep};

/// Plays the script strictly in order: after `start_delay`, each step is
/// announced and then its own delay elapses before the next one.
///
/// Returns `false` if `cancel` fired before the script finished; no further
/// steps are emitted after that.
pub async fn run_script(
    steps: &[ScriptStep],
    start_delay: Duration,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> bool {
    let total = steps.len();
    rfp_info!("simulation started steps={}", total);

    if !pause(start_delay, cancel).await {
        sink.emit(EngineEvent::SimulationCancelled);
        return false;
    }

    for (index, step) in steps.iter().enumerate() {
        rfp_debug!("simulation step {}/{}", index + 1, total);
        sink.emit(EngineEvent::SimulationStep {
            index,
            total,
            message: step.message.clone(),
        });
        if !pause(step.delay, cancel).await {
            rfp_info!("simulation cancelled after step {}", index + 1);
            sink.emit(EngineEvent::SimulationCancelled);
            return false;
        }
    }

    sink.emit(EngineEvent::SimulationFinished);
    true
}

async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
