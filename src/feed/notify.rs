//! Operation Outcome Notifications
//!
//! The feed manager reports user-facing outcomes through this interface
//! instead of a global toast singleton, so the core runs without a UI.

use log::{info, warn};

/// Callback interface for user-visible operation outcomes
pub trait Notifier: Send + Sync {
    /// An operation the user triggered finished successfully
    fn success(&self, message: &str);

    /// An operation failed; the message is safe to show verbatim
    fn error(&self, message: &str);
}

/// Default notifier that writes outcomes to the application log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        warn!("{}", message);
    }
}
