//! Verify command - run a test definition against a program

use crate::reporter::{json_report, TextReporter};
use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use verifier_config::TestDefinition;
use verifier_core::{NullObserver, Suite, SuiteOptions};

/// Arguments for a verification run
pub struct VerifyArgs {
    /// Command line launching the program under test
    pub program: String,
    /// Path to the JSON test definition
    pub tests: PathBuf,
    /// Suppress the stderr side channel
    pub hide_stderr: bool,
    /// Per-test timeout
    pub timeout: Duration,
    /// Run test cases in parallel
    pub parallel: bool,
    /// Only run tests whose name contains this pattern
    pub filter: Option<String>,
    /// Output in JSON format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
}

/// Load the definition file
///
/// Fails before any test runs if the file is missing or malformed.
pub fn load(args: &VerifyArgs) -> Result<TestDefinition> {
    TestDefinition::load_from_file(&args.tests)
        .with_context(|| format!("failed to load test definition '{}'", args.tests.display()))
}

/// Run every test case and print the report
///
/// Returns whether all test cases passed.
pub fn run(args: VerifyArgs, definition: TestDefinition) -> Result<bool> {
    if args.no_color {
        colored::control::set_override(false);
    }

    tracing::info!(
        program = %args.program,
        tests = definition.tests.len(),
        timeout = ?args.timeout,
        parallel = args.parallel,
        "starting verification run"
    );

    let options = SuiteOptions {
        timeout: args.timeout,
        hide_stderr: args.hide_stderr,
        parallel: args.parallel,
        filter: args.filter,
    };
    let suite = Suite::with_options(args.program, definition, options);

    let report = if args.json {
        let report = suite.run(&mut NullObserver);
        let document = json_report(&report, suite.mode(), args.hide_stderr);
        println!(
            "{}",
            serde_json::to_string_pretty(&document).context("failed to serialize report")?
        );
        report
    } else {
        let mut reporter = TextReporter::new(io::stdout().lock());
        suite.run(&mut reporter)
    };

    Ok(report.was_successful())
}
