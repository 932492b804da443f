use std::time::Duration;

use crate::FormInput;

/// Pause between choosing the simulated branch and the first step.
pub const SIMULATION_START_DELAY: Duration = Duration::from_millis(350);
/// Simulated steps never report more than this; only completion reaches 100.
pub const SIMULATION_PROGRESS_CAP: u8 = 95;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationStep {
    pub message: String,
    /// Time to wait after this step before the next one (or completion).
    pub delay: Duration,
}

impl SimulationStep {
    fn new(message: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            message: message.into(),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// The fixed crawl, extract, check, draft, package script shown when no
/// backend is reachable.
pub fn simulation_script(input: &FormInput) -> Vec<SimulationStep> {
    vec![
        SimulationStep::new(
            format!(
                "Crawling {} for product and pipeline pages…",
                input.company_url
            ),
            900,
        ),
        SimulationStep::new("Resolving internal links and product detail pages…", 900),
        SimulationStep::new("Scraping content and extracting medical claims…", 1000),
        SimulationStep::new("Checking content against FDA/OPDP guidance…", 1000),
        SimulationStep::new(
            format!(
                "Drafting outreach tailored to {} and audience…",
                input.drug_name
            ),
            1000,
        ),
        SimulationStep::new(
            "Packaging proposal with compliance notes and email drafts…",
            900,
        ),
    ]
}

/// Progress shown while step `index` (zero-based) of `total` runs:
/// `min(95, round(100 * index / total))`.
pub fn simulation_progress(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Integer round-half-up of 100 * index / total.
    let rounded = (200 * index + total) / (2 * total);
    rounded.min(usize::from(SIMULATION_PROGRESS_CAP)) as u8
}
