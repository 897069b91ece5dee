//! Interactive selection boundary contract.

use kuma_find_shared::Result;
use std::path::PathBuf;

/// Boundary contract for the disambiguation menu.
///
/// Implementations present `candidates` numbered from 1 together with a
/// `Choose [1-N]: ` prompt, then block for exactly one line of input. They never
/// loop or retry; interpreting the line is the caller's job.
pub trait SelectionPromptPort {
    /// Show the menu and return the raw line, or `None` on end of input.
    fn choose(&self, query: &str, candidates: &[PathBuf]) -> Result<Option<Box<str>>>;
}
