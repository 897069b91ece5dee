//! Integration tests for the find-service use case.

use kuma_find_app::{FindServiceDeps, FindServiceInput, IndexerSettings, find_service};
use kuma_find_domain::{AbortReason, IdentifierKind, Resolution};
use kuma_find_shared::{ErrorCode, Result};
use kuma_find_testkit::in_memory::{InMemoryFleet, MemoryLogger, MemoryResultSink, ScriptedPrompt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct Harness {
    sink: Arc<MemoryResultSink>,
    prompt: Arc<ScriptedPrompt>,
    logger: MemoryLogger,
    deps: FindServiceDeps,
}

fn harness(fleet: InMemoryFleet, sink: MemoryResultSink, prompt: ScriptedPrompt) -> Harness {
    let sink = Arc::new(sink);
    let prompt = Arc::new(prompt);
    let logger = MemoryLogger::new();
    let deps = FindServiceDeps {
        filesystem: Arc::new(fleet),
        prompt: prompt.clone(),
        sink: sink.clone(),
        logger: Some(Arc::new(logger.clone())),
    };
    Harness {
        sink,
        prompt,
        logger,
        deps,
    }
}

fn input(query: &str, interactive: bool) -> FindServiceInput {
    FindServiceInput {
        fleet_root: PathBuf::from("/srv/webcom"),
        query: query.into(),
        settings: IndexerSettings::default(),
        interactive,
    }
}

fn webcom_fleet() -> InMemoryFleet {
    InMemoryFleet::new()
        .service("alice", "MAIL_TO=alice@example.com,ops@example.com\nUSERNAME=1001\n")
        .display_name("alice", "Alice Jansen")
        .service("_old-ops", "USERNAME=2002\n")
        .display_name("_old-ops", "Ops")
        .service("ops", "USERNAME=2002\nMAIL_TO=ops@example.com\n")
        .display_name("ops", "ops")
}

#[test]
fn found_path_is_written_to_the_sink() -> Result<()> {
    let harness = harness(webcom_fleet(), MemoryResultSink::new(), ScriptedPrompt::default());
    let output = find_service(&harness.deps, &input("1001", true))?;

    assert_eq!(output.kind, IdentifierKind::Username);
    assert_eq!(
        output.resolution,
        Resolution::Found {
            directory: PathBuf::from("/srv/webcom/alice")
        }
    );
    assert_eq!(harness.sink.current(), Some(PathBuf::from("/srv/webcom/alice")));
    assert!(harness.logger.contains("find.sink.written"));
    assert_eq!(output.result_location.as_ref(), "memory");
    Ok(())
}

#[test]
fn underscore_duplicate_is_discarded() -> Result<()> {
    let harness = harness(webcom_fleet(), MemoryResultSink::new(), ScriptedPrompt::default());
    let output = find_service(&harness.deps, &input("OPS", true))?;

    assert_eq!(
        output.resolution,
        Resolution::AutoSelected {
            directory: PathBuf::from("/srv/webcom/ops"),
            discarded: PathBuf::from("/srv/webcom/_old-ops"),
        }
    );
    assert_eq!(harness.sink.current(), Some(PathBuf::from("/srv/webcom/ops")));
    assert!(harness.prompt.menus().is_empty());
    Ok(())
}

#[test]
fn shared_email_prompts_and_writes_the_pick() -> Result<()> {
    let harness = harness(
        webcom_fleet(),
        MemoryResultSink::new(),
        ScriptedPrompt::answering(&["1"]),
    );
    let output = find_service(&harness.deps, &input("ops@example.com", true))?;

    assert_eq!(output.resolution.directory(), Some(Path::new("/srv/webcom/alice")));
    assert_eq!(harness.prompt.menus().len(), 1);
    assert_eq!(harness.sink.writes(), 1);
    Ok(())
}

#[test]
fn aborted_choice_clears_a_stale_result() -> Result<()> {
    let harness = harness(
        webcom_fleet(),
        MemoryResultSink::with_stale("/srv/webcom/previous"),
        ScriptedPrompt::answering(&["nope"]),
    );
    let output = find_service(&harness.deps, &input("ops@example.com", true))?;

    assert!(matches!(
        output.resolution,
        Resolution::Aborted {
            reason: AbortReason::InvalidChoice { .. },
            ..
        }
    ));
    assert_eq!(harness.sink.current(), None);
    assert!(harness.logger.contains("find.sink.cleared"));
    Ok(())
}

#[test]
fn non_interactive_run_never_prompts() -> Result<()> {
    let harness = harness(
        webcom_fleet(),
        MemoryResultSink::new(),
        ScriptedPrompt::answering(&["1"]),
    );
    let output = find_service(&harness.deps, &input("ops@example.com", false))?;

    assert!(matches!(
        output.resolution,
        Resolution::Aborted {
            reason: AbortReason::NonInteractive,
            ..
        }
    ));
    assert!(harness.prompt.menus().is_empty());
    Ok(())
}

#[test]
fn suggestion_is_never_written() -> Result<()> {
    let harness = harness(
        webcom_fleet(),
        MemoryResultSink::with_stale("/srv/webcom/previous"),
        ScriptedPrompt::default(),
    );
    let output = find_service(&harness.deps, &input("alice jansn", true))?;

    let Resolution::NoMatch { suggestion } = &output.resolution else {
        return Err(kuma_find_shared::ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("unexpected resolution: {:?}", output.resolution),
        ));
    };
    assert_eq!(
        suggestion.as_ref().map(|found| found.directory.clone()),
        Some(PathBuf::from("/srv/webcom/alice"))
    );
    assert_eq!(harness.sink.current(), None);
    assert_eq!(harness.sink.writes(), 0);
    Ok(())
}

#[test]
fn unavailable_fleet_root_clears_the_sink_and_fails() {
    let harness = harness(
        InMemoryFleet::without_root(),
        MemoryResultSink::with_stale("/srv/webcom/previous"),
        ScriptedPrompt::default(),
    );
    let error = find_service(&harness.deps, &input("ops", true)).err();

    assert_eq!(
        error.map(|error| error.code),
        Some(ErrorCode::new("index", "fleet_root_unavailable"))
    );
    assert_eq!(harness.sink.current(), None);
}

#[test]
fn sink_write_failure_is_surfaced() {
    let harness = harness(webcom_fleet(), MemoryResultSink::failing(), ScriptedPrompt::default());
    let error = find_service(&harness.deps, &input("1001", true)).err();
    assert_eq!(error.map(|error| error.code), Some(ErrorCode::io()));
}
