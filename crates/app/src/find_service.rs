//! Find-service use case: index, resolve and persist the outcome.

use crate::build_indices::{
    BuildIndicesDeps, BuildIndicesInput, FleetScanStats, IndexerSettings, build_fleet_indices,
};
use crate::resolve::resolve_query;
use kuma_find_domain::{IdentifierKind, Resolution, classify_query};
use kuma_find_ports::{
    FleetFileSystemPort, LogFields, LoggerPort, ResultSinkPort, SelectionPromptPort,
};
use kuma_find_shared::Result;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Input payload for a single lookup.
#[derive(Debug, Clone)]
pub struct FindServiceInput {
    /// Absolute fleet root.
    pub fleet_root: PathBuf,
    /// Raw operator query.
    pub query: Box<str>,
    /// Indexer layout settings.
    pub settings: IndexerSettings,
    /// Whether ambiguous matches may prompt the operator.
    pub interactive: bool,
}

/// Dependencies required by the find use case.
#[derive(Clone)]
pub struct FindServiceDeps {
    /// Read-only fleet access.
    pub filesystem: Arc<dyn FleetFileSystemPort>,
    /// Menu prompt for ambiguous matches.
    pub prompt: Arc<dyn SelectionPromptPort>,
    /// Result file consumed by the shell wrapper.
    pub sink: Arc<dyn ResultSinkPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Output of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindServiceOutput {
    /// Identifier family the query was classified as.
    pub kind: IdentifierKind,
    /// Resolution outcome.
    pub resolution: Resolution,
    /// Fleet walk counters.
    pub stats: FleetScanStats,
    /// Where the result was written or cleared.
    pub result_location: Box<str>,
}

/// Resolve `input.query` to one service directory and update the result sink.
///
/// A resolved directory is written to the sink; every other outcome clears it,
/// so the shell wrapper never acts on a stale path. Only an inaccessible fleet
/// root or a sink failure is returned as an error.
pub fn find_service(deps: &FindServiceDeps, input: &FindServiceInput) -> Result<FindServiceOutput> {
    let logger = deps.logger.as_deref();
    let kind = classify_query(&input.query);

    let index_deps = BuildIndicesDeps {
        filesystem: Arc::clone(&deps.filesystem),
        logger: deps.logger.clone(),
    };
    let index_input = BuildIndicesInput {
        fleet_root: input.fleet_root.clone(),
        settings: input.settings.clone(),
    };
    let scan = match build_fleet_indices(&index_deps, &index_input) {
        Ok(scan) => scan,
        Err(error) => {
            clear_sink(deps.sink.as_ref(), logger)?;
            return Err(error);
        },
    };

    let prompt = input.interactive.then_some(deps.prompt.as_ref());
    let resolution = resolve_query(&scan.indices, &input.query, prompt, logger);

    match resolution.directory() {
        Some(directory) => {
            deps.sink.write_result(directory)?;
            if let Some(logger) = logger {
                let mut fields = sink_fields(deps.sink.as_ref());
                fields.insert("outcome".into(), Value::String(resolution.label().to_owned()));
                logger.info("find.sink.written", "Result file written", Some(fields));
            }
        },
        None => clear_sink(deps.sink.as_ref(), logger)?,
    }

    Ok(FindServiceOutput {
        kind,
        resolution,
        stats: scan.stats,
        result_location: deps.sink.location(),
    })
}

fn clear_sink(sink: &dyn ResultSinkPort, logger: Option<&dyn LoggerPort>) -> Result<()> {
    sink.clear_result()?;
    if let Some(logger) = logger {
        logger.debug(
            "find.sink.cleared",
            "Result file cleared",
            Some(sink_fields(sink)),
        );
    }
    Ok(())
}

fn sink_fields(sink: &dyn ResultSinkPort) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert("location".into(), Value::String(sink.location().into_string()));
    fields
}
