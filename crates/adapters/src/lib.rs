//! # kuma-find-adapters
//!
//! Adapter implementations for ports (local filesystem, terminal prompt,
//! result file, JSON logging).
//! This crate depends on `ports` and `shared`.

pub mod fs;
pub mod log_sink;
pub mod logger;
pub mod prompt;
pub mod result_sink;

/// Crate metadata.
pub mod placeholder {
    /// Crate version, used by tests.
    #[must_use]
    pub const fn adapters_crate_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

pub use fs::LocalFileSystem;
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;
pub use placeholder::adapters_crate_version;
pub use prompt::LinePrompt;
pub use result_sink::TempFileResultSink;
