use std::sync::Arc;

use crate::config::Config;
use crate::interviews::InterviewRegistry;
use crate::report::ReportScheduler;
use crate::vendors::SmsSender;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pending interviews by phone number. In-memory unless REDIS_URL is set.
    pub registry: Arc<dyn InterviewRegistry>,
    pub sms: Arc<dyn SmsSender>,
    /// Delayed report jobs armed by the status callback.
    pub scheduler: Arc<ReportScheduler>,
    pub config: Config,
}
