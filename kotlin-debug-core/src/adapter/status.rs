//! Status and progress reporting during provisioning.

use tracing::{debug, info, warn};

use super::fetch::FetchProgress;

/// Sink for human-readable status messages and download progress.
///
/// Front-ends implement this to surface provisioning state to the operator.
pub trait StatusReporter: Send + Sync {
    /// Replaces the current status line.
    fn update(&self, message: &str);

    /// Reports download progress. Ignored by default.
    fn progress(&self, progress: &FetchProgress) {
        let _ = progress;
    }

    /// Surfaces a warning the operator should see.
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Reporter that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatus;

impl StatusReporter for LogStatus {
    fn update(&self, message: &str) {
        info!(status = %message, "Provisioning status");
    }

    fn progress(&self, progress: &FetchProgress) {
        match progress.percent() {
            Some(percent) => debug!(percent, "Debug adapter download progress"),
            None => debug!(bytes = progress.received, "Debug adapter download progress"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Reporter that records every message, for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingStatus {
        pub updates: Mutex<Vec<String>>,
        pub warnings: Mutex<Vec<String>>,
    }

    impl RecordingStatus {
        pub fn updates(&self) -> Vec<String> {
            self.updates.lock().unwrap().clone()
        }

        pub fn warnings(&self) -> Vec<String> {
            self.warnings.lock().unwrap().clone()
        }
    }

    impl StatusReporter for RecordingStatus {
        fn update(&self, message: &str) {
            self.updates.lock().unwrap().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }
}
