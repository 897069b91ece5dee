//! Line-oriented selection prompt.

use kuma_find_ports::SelectionPromptPort;
use kuma_find_shared::{ErrorEnvelope, Result};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Prompt writing a numbered menu to `output` and reading one line of `input`.
pub struct LinePrompt<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Build a prompt over arbitrary reader and writer.
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Consume the prompt, returning the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input.into_inner(), self.output.into_inner())
    }
}

impl LinePrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt bound to the process stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

fn write_menu(output: &mut impl Write, query: &str, candidates: &[PathBuf]) -> std::io::Result<()> {
    writeln!(output, "Multiple matches for \"{query}\":")?;
    for (position, candidate) in candidates.iter().enumerate() {
        writeln!(output, "  {}) {}", position + 1, candidate.display())?;
    }
    write!(output, "Choose [1-{}]: ", candidates.len())?;
    output.flush()
}

impl<R: BufRead, W: Write> SelectionPromptPort for LinePrompt<R, W> {
    fn choose(&self, query: &str, candidates: &[PathBuf]) -> Result<Option<Box<str>>> {
        write_menu(&mut *self.output.borrow_mut(), query, candidates).map_err(ErrorEnvelope::from)?;

        let mut line = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut line)
            .map_err(ErrorEnvelope::from)?;
        if read == 0 {
            // Keep the next output line off the prompt line.
            writeln!(self.output.borrow_mut()).map_err(ErrorEnvelope::from)?;
            return Ok(None);
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line.into_boxed_str()))
    }
}
