pub mod normalizer;
mod orchestrator;
mod scheduler;

pub use orchestrator::{Ingestor, RunSummary};
pub use scheduler::Scheduler;

/// The ingestor as wired in production.
pub type NewsIngestor = Ingestor<crate::feed::FetchAdapter>;
