// Post-call side of the workflow: the telephony status webhook, the delayed
// report scheduler, the report job and its PDF documents.

pub mod gate;
pub mod generator;
pub mod handlers;
pub mod render;
pub mod scheduler;

pub use generator::{ReportGenerator, ReportSettings};
pub use scheduler::ReportScheduler;
