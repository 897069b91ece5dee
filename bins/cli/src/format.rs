//! Human output for lookup outcomes.

use kuma_find_domain::{AbortReason, Resolution};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Render the stdout lines describing a resolution.
///
/// The interactive menu itself is written by the prompt while it waits for
/// input, so only the non-interactive abort repeats the candidate list.
#[must_use]
pub fn format_resolution(query: &str, resolution: &Resolution) -> String {
    let mut out = String::new();
    match resolution {
        Resolution::Found { directory } => {
            let _ = writeln!(out, "Found: {}", directory.display());
        },
        Resolution::AutoSelected {
            directory,
            discarded,
        } => {
            let _ = writeln!(out, "Ignored (leading underscore): {}", discarded.display());
            let _ = writeln!(out, "Auto-selected: {}", directory.display());
        },
        Resolution::Picked { directory, .. } => {
            let _ = writeln!(out, "You picked: {}", directory.display());
        },
        Resolution::Aborted {
            candidates,
            reason: AbortReason::NonInteractive,
        } => {
            write_candidates(&mut out, query, candidates);
            out.push_str("Not prompting in non-interactive mode - aborting.\n");
        },
        Resolution::Aborted { .. } => out.push_str("Invalid choice - aborting.\n"),
        Resolution::NoMatch { suggestion } => {
            let _ = writeln!(out, "No exact match for \"{query}\".");
            if let Some(suggestion) = suggestion {
                let _ = writeln!(
                    out,
                    "Closest match: {} ({})",
                    suggestion.name,
                    suggestion.directory.display()
                );
            }
        },
    }
    out
}

fn write_candidates(out: &mut String, query: &str, candidates: &[PathBuf]) {
    let _ = writeln!(out, "Multiple matches for \"{query}\":");
    for (position, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(out, "  {}) {}", position + 1, candidate.display());
    }
}
