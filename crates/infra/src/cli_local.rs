//! Local CLI orchestration: wire adapters and run one lookup.

use crate::InfraResult;
use crate::config_check::{LoadedFinderConfig, load_finder_config};
use crate::runtime::RuntimeDirs;
use kuma_find_adapters::{JsonLogger, LinePrompt, LocalFileSystem, LogSink, StderrLogSink, TempFileResultSink};
use kuma_find_app::{FindServiceDeps, FindServiceInput, FindServiceOutput, find_service};
use kuma_find_config::ENV_VARS;
use kuma_find_ports::{LogLevel, LoggerPort, SelectionPromptPort};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One lookup request as parsed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindRequest {
    /// Raw operator query.
    pub query: Box<str>,
    /// Whether ambiguous matches may prompt.
    pub interactive: bool,
    /// Log level flag, overriding the env var.
    pub log_level: Option<Box<str>>,
    /// Optional config file.
    pub config_path: Option<PathBuf>,
}

/// Outcome of a local lookup together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindReport {
    /// Use-case output.
    pub output: FindServiceOutput,
    /// Fleet root that was walked.
    pub fleet_root: PathBuf,
    /// Result file location.
    pub result_file: PathBuf,
}

/// Snapshot the finder env vars of the current process.
#[must_use]
pub fn std_env_map() -> BTreeMap<String, String> {
    ENV_VARS
        .iter()
        .filter_map(|name| {
            std::env::var_os(name).map(|value| ((*name).to_owned(), value.to_string_lossy().into_owned()))
        })
        .collect()
}

/// Build the structured logger writing JSON lines to `sink`.
#[must_use]
pub fn build_logger(sink: Arc<dyn LogSink>, level: LogLevel) -> Arc<dyn LoggerPort> {
    Arc::new(JsonLogger::new(sink).with_min_level(level))
}

/// Run a lookup against the process environment, prompting on stdin/stdout.
pub fn run_find_local(request: &FindRequest) -> InfraResult<FindReport> {
    let prompt: Arc<dyn SelectionPromptPort> = Arc::new(LinePrompt::stdio());
    run_find_with(
        &std_env_map(),
        &RuntimeDirs::from_std_env(),
        request,
        prompt,
        Arc::new(StderrLogSink),
    )
}

/// Run a lookup with explicit env, host directories, prompt and log sink.
pub fn run_find_with(
    env: &BTreeMap<String, String>,
    dirs: &RuntimeDirs,
    request: &FindRequest,
    prompt: Arc<dyn SelectionPromptPort>,
    log_sink: Arc<dyn LogSink>,
) -> InfraResult<FindReport> {
    let LoadedFinderConfig { resolved, .. } = load_finder_config(
        env,
        request.config_path.as_deref(),
        dirs,
        request.log_level.as_deref(),
    )?;

    let deps = FindServiceDeps {
        filesystem: Arc::new(LocalFileSystem::new()),
        prompt,
        sink: Arc::new(TempFileResultSink::new(resolved.result_file.clone())),
        logger: Some(build_logger(log_sink, resolved.log_level)),
    };
    let input = FindServiceInput {
        fleet_root: resolved.fleet_root.clone(),
        query: request.query.clone(),
        settings: resolved.indexer,
        interactive: request.interactive,
    };
    let output = find_service(&deps, &input)?;

    Ok(FindReport {
        output,
        fleet_root: resolved.fleet_root,
        result_file: resolved.result_file,
    })
}

/// Resolve the result file location the way a lookup would.
pub fn resolve_result_file(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    dirs: &RuntimeDirs,
) -> InfraResult<PathBuf> {
    let loaded = load_finder_config(env, config_path, dirs, None)?;
    Ok(loaded.resolved.result_file)
}
