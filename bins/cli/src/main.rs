//! CLI binary entrypoint.

mod error;
mod format;

use clap::Parser;
use error::{CliError, ExitCode};
use format::format_resolution;
use kuma_find_infra::{
    FindRequest, RuntimeDirs, load_effective_config_json, resolve_result_file, run_find_local,
    shell_init_snippet, std_env_map,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kuma-find",
    version,
    about = "Resolve a managed service directory from an email, username or display name",
    long_about = None
)]
struct Cli {
    /// Email address, numeric username or display name (case-insensitive).
    #[arg(required_unless_present_any = ["print_config", "shell_init"])]
    query: Option<String>,

    /// Optional config file (TOML, or JSON with a `.json` extension).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Never prompt; ambiguous matches abort.
    #[arg(long)]
    non_interactive: bool,

    /// Structured log threshold (debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long, conflicts_with_all = ["query", "shell_init"])]
    print_config: bool,

    /// Print the `kf` shell function and exit.
    #[arg(long, conflicts_with = "query")]
    shell_init: bool,
}

struct CliOutput {
    stdout: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli) -> Result<CliOutput, CliError> {
    if cli.print_config {
        return print_config(cli);
    }
    if cli.shell_init {
        return shell_init(cli);
    }
    let query = cli.query.clone().unwrap_or_default();
    find(cli, query)
}

fn find(cli: &Cli, query: String) -> Result<CliOutput, CliError> {
    let request = FindRequest {
        query: query.into_boxed_str(),
        interactive: !cli.non_interactive,
        log_level: cli.log_level.as_deref().map(Box::from),
        config_path: cli.config.clone(),
    };
    let report = run_find_local(&request)?;
    let resolution = &report.output.resolution;

    Ok(CliOutput {
        stdout: format_resolution(&request.query, resolution),
        exit_code: if resolution.is_resolved() {
            ExitCode::Ok
        } else {
            ExitCode::NotResolved
        },
    })
}

fn print_config(cli: &Cli) -> Result<CliOutput, CliError> {
    let json = load_effective_config_json(
        &std_env_map(),
        cli.config.as_deref(),
        &RuntimeDirs::from_std_env(),
    )?;
    Ok(CliOutput {
        stdout: json,
        exit_code: ExitCode::Ok,
    })
}

fn shell_init(cli: &Cli) -> Result<CliOutput, CliError> {
    let result_file = resolve_result_file(
        &std_env_map(),
        cli.config.as_deref(),
        &RuntimeDirs::from_std_env(),
    )?;
    let binary = std::env::current_exe()
        .map_or_else(|_| "kuma-find".to_owned(), |path| path.display().to_string());
    Ok(CliOutput {
        stdout: shell_init_snippet(&binary, &result_file),
        exit_code: ExitCode::Ok,
    })
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
