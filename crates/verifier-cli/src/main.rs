use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use verifier_core::DEFAULT_TIMEOUT;

mod config;
mod reporter;
mod verify;

/// Black-box test harness for stdin/stdout programs.
///
/// Runs a program once per test case, feeds it the case's input on stdin and
/// checks what it prints on stdout against the expected output, either line
/// by line or as an unordered collection.
///
/// EXAMPLES:
///     verify -p ./solution -t tests.json           Run all test cases
///     verify -p "python3 main.py" -t tests.json    Program with arguments
///     verify -p ./solution -t tests.json -e        Hide the program's stderr
///     verify -p ./solution -t tests.json --json    Machine-readable report
///
/// ENVIRONMENT VARIABLES:
///     VERIFY_TIMEOUT    Per-test timeout in seconds (default 1)
///     VERIFY_JSON       Set to '1' for JSON output by default
///     NO_COLOR          Set to disable colored output
///     RUST_LOG          Log filter for diagnostics on stderr
#[derive(Parser)]
#[command(name = "verify")]
#[command(version)]
struct Cli {
    /// Command line that launches the program under test
    #[arg(short = 'p', long)]
    program: String,

    /// Path to the JSON test definition file
    #[arg(short = 't', long)]
    tests: PathBuf,

    /// Do not show what the program writes to stderr
    #[arg(short = 'e', long = "stderr_hide", visible_alias = "stderr-hide")]
    stderr_hide: bool,

    /// Per-test timeout in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        env = "VERIFY_TIMEOUT",
        value_parser = config::parse_seconds
    )]
    timeout: Option<Duration>,

    /// Only run tests whose name contains this pattern
    #[arg(long, value_name = "PATTERN")]
    filter: Option<String>,

    /// Run test cases in parallel
    #[arg(long)]
    parallel: bool,

    /// Output results in JSON format
    #[arg(long, env = "VERIFY_JSON", value_parser = FalseyValueParser::new())]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cli_config = config::Config::from_env();

    // Command-line flags override environment variables
    let args = verify::VerifyArgs {
        program: cli.program,
        tests: cli.tests,
        hide_stderr: cli.stderr_hide,
        timeout: cli.timeout.or(cli_config.timeout).unwrap_or(DEFAULT_TIMEOUT),
        parallel: cli.parallel,
        filter: cli.filter,
        json: cli.json || cli_config.default_json,
        no_color: cli.no_color || cli_config.no_color,
    };

    let definition = match verify::load(&args) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match verify::run(args, definition) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
