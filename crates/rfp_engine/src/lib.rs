//! RFP engine: backend IO, the simulation sequencer and effect execution.
mod client;
mod engine;
mod filename;
mod persist;
mod simulate;
mod types;

pub use client::{ClientSettings, ProposalClient, ReqwestProposalClient, HEALTH_PATH, RFP_PATH};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EngineSettings, EventSink};
pub use filename::{brief_filename, BRIEF_MIME_TYPE};
pub use persist::{ensure_output_dir, save_brief, AtomicFileWriter, PersistError};
pub use simulate::run_script;
pub use types::{EngineEvent, FailureKind, ProposalError, RfpRequest, RfpResponse, ScriptStep};
