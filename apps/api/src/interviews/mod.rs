// Invitation side of the workflow: pending-interview records, the prompt
// composer, SMS dispatch, and the voice platform's prompt-fetch webhook.

pub mod dispatcher;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod registry;

pub use registry::{InMemoryRegistry, InterviewRegistry};
