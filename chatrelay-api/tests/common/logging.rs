use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Captures `chatrelay_api` events for the current thread into a temp file
pub struct TestLogger {
    dir: tempfile::TempDir,
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestLogger {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create test log dir");
        let log_file = std::fs::File::create(dir.path().join("test.log"))
            .expect("Failed to create test log file");

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("chatrelay_api=debug"))
            .with(
                fmt::layer()
                    .with_writer(Mutex::new(log_file))
                    .with_ansi(false)
                    .with_target(false)
                    .compact(),
            );

        let guard = tracing::subscriber::set_default(subscriber);

        Self { dir, _guard: guard }
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("test.log")
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }
}
