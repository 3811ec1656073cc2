pub mod orchestrator;
pub mod page;

pub use orchestrator::{AudioOrchestrator, AudioRequestOutcome};
pub use page::{AudioSupport, ReaderPage};
