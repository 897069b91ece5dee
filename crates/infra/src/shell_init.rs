//! Shell wrapper snippet.
//!
//! A child process cannot change its parent's working directory, so the
//! binary writes the resolved path to the result file and a shell function
//! performs the `cd`.

use std::path::Path;

/// Name of the generated shell function.
pub const SHELL_FUNCTION_NAME: &str = "kf";

/// Quote `value` for a POSIX shell using single quotes.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render the POSIX `kf` function for `binary` and `result_file`.
///
/// The result file is pinned through `KUMA_FIND_RESULT_FILE` so the binary
/// and the wrapper always agree on its location. It is removed before each
/// run, so flag-only invocations (`--help`, `--print-config`) leave the
/// working directory alone.
#[must_use]
pub fn shell_init_snippet(binary: &str, result_file: &Path) -> String {
    let binary = shell_quote(binary);
    let result_file = shell_quote(&result_file.display().to_string());
    format!(
        "{SHELL_FUNCTION_NAME}() {{\n    \
         rm -f -- {result_file}\n    \
         KUMA_FIND_RESULT_FILE={result_file} {binary} \"$@\" || return $?\n    \
         [ -s {result_file} ] || return 0\n    \
         cd -- \"$(cat {result_file})\"\n\
         }}\n"
    )
}
