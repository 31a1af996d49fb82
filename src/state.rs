use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::rate_limit::SubmissionRateLimiter;
use crate::variants::VariantRegistry;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub variants: VariantRegistry,
    /// `None` when the process was started without mail configuration.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub submission_limiter: SubmissionRateLimiter,
}
