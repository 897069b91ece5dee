//! Resolver: exact lookup, underscore tie-break and interactive disambiguation.

use crate::fallback::closest_match;
use kuma_find_domain::{
    AbortReason, FleetIndices, IdentifierKind, Resolution, TieBreak, break_underscore_tie,
    classify_query, normalize_query,
};
use kuma_find_ports::{LogFields, LoggerPort, SelectionPromptPort};
use serde_json::Value;
use std::path::PathBuf;

/// Parse a menu answer into a zero-based candidate position.
///
/// The line is trimmed; only an integer in `1..=count` is accepted.
#[must_use]
pub fn parse_menu_choice(line: &str, count: usize) -> Option<usize> {
    let choice = line.trim().parse::<usize>().ok()?;
    (1..=count).contains(&choice).then(|| choice - 1)
}

/// Resolve a raw query against the fleet indices.
///
/// Without a prompt, ambiguous matches abort with
/// [`AbortReason::NonInteractive`] instead of blocking on input.
pub fn resolve_query(
    indices: &FleetIndices,
    query: &str,
    prompt: Option<&dyn SelectionPromptPort>,
    logger: Option<&dyn LoggerPort>,
) -> Resolution {
    let kind = classify_query(query);
    let normalized = normalize_query(query);
    let index = indices.for_kind(kind);
    let matches = index.lookup(&normalized);

    match matches {
        [] => {
            let suggestion = match kind {
                IdentifierKind::Name => closest_match(index, &normalized),
                IdentifierKind::Email | IdentifierKind::Username => None,
            };
            if let Some(logger) = logger {
                let mut fields = kind_fields(kind, 0);
                fields.insert("suggested".into(), Value::Bool(suggestion.is_some()));
                logger.info("find.resolve.no_match", "No exact match", Some(fields));
            }
            Resolution::NoMatch { suggestion }
        },
        [only] => Resolution::Found {
            directory: only.clone(),
        },
        candidates => match break_underscore_tie(candidates) {
            TieBreak::Selected {
                selected,
                discarded,
            } => {
                if let Some(logger) = logger {
                    let mut fields = kind_fields(kind, candidates.len());
                    fields.insert(
                        "discarded".into(),
                        Value::String(discarded.display().to_string()),
                    );
                    logger.info(
                        "find.resolve.auto_selected",
                        "Underscore tie-break selected the live directory",
                        Some(fields),
                    );
                }
                Resolution::AutoSelected {
                    directory: selected,
                    discarded,
                }
            },
            TieBreak::Undecided => {
                if let Some(logger) = logger {
                    logger.info(
                        "find.resolve.ambiguous",
                        "Multiple matches need a human choice",
                        Some(kind_fields(kind, candidates.len())),
                    );
                }
                disambiguate(query, candidates, prompt, logger)
            },
        },
    }
}

fn disambiguate(
    query: &str,
    candidates: &[PathBuf],
    prompt: Option<&dyn SelectionPromptPort>,
    logger: Option<&dyn LoggerPort>,
) -> Resolution {
    let answer = match prompt {
        None => Err(AbortReason::NonInteractive),
        Some(prompt) => match prompt.choose(query, candidates) {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(AbortReason::EndOfInput),
            Err(error) => {
                if let Some(logger) = logger {
                    let mut fields = LogFields::new();
                    fields.insert("errorCode".into(), Value::String(error.code.to_string()));
                    logger.warn(
                        "find.resolve.prompt_failed",
                        "Selection prompt failed; treating it as end of input",
                        Some(fields),
                    );
                }
                Err(AbortReason::EndOfInput)
            },
        },
    };

    let outcome = answer.and_then(|line| {
        parse_menu_choice(&line, candidates.len())
            .and_then(|position| candidates.get(position).map(|directory| (position, directory)))
            .ok_or(AbortReason::InvalidChoice { input: line })
    });

    match outcome {
        Ok((position, directory)) => Resolution::Picked {
            directory: directory.clone(),
            choice: position + 1,
            candidates: candidates.len(),
        },
        Err(reason) => aborted(candidates, reason, logger),
    }
}

fn aborted(
    candidates: &[PathBuf],
    reason: AbortReason,
    logger: Option<&dyn LoggerPort>,
) -> Resolution {
    if let Some(logger) = logger {
        let mut fields = LogFields::new();
        fields.insert("candidates".into(), Value::from(candidates.len()));
        fields.insert("reason".into(), Value::String(abort_label(&reason).to_owned()));
        logger.info("find.resolve.aborted", "Disambiguation aborted", Some(fields));
    }
    Resolution::Aborted {
        candidates: candidates.to_vec(),
        reason,
    }
}

const fn abort_label(reason: &AbortReason) -> &'static str {
    match reason {
        AbortReason::InvalidChoice { .. } => "invalid_choice",
        AbortReason::EndOfInput => "end_of_input",
        AbortReason::NonInteractive => "non_interactive",
    }
}

fn kind_fields(kind: IdentifierKind, candidates: usize) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert("kind".into(), Value::String(kind.as_str().to_owned()));
    fields.insert("candidates".into(), Value::from(candidates));
    fields
}
