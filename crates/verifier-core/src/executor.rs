//! Single test case execution
//!
//! A [`TestCaseExecutor`] moves one test case through
//! `Pending -> Running -> Finished`, where the finished outcome is either a
//! pass or a failure carrying its reason. There are no retries.

use crate::error::RunError;
use crate::normalize::normalize;
use crate::observer::SuiteObserver;
use crate::process::ProcessRunner;
use crate::validate::{validate, ComparisonMode, Mismatch, ValidationOutcome};
use std::fmt;
use std::time::{Duration, Instant};
use verifier_config::TestCase;

/// Why a test case failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Output did not match the expectation
    Mismatch(Mismatch),
    /// The program overran the timeout and was killed
    Timeout(Duration),
    /// The program could not be started
    Launch(String),
    /// Communication with the program failed
    Io(String),
}

impl FailureReason {
    /// Short machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::Mismatch(_) => "mismatch",
            FailureReason::Timeout(_) => "timeout",
            FailureReason::Launch(_) => "launch",
            FailureReason::Io(_) => "io",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Mismatch(mismatch) => write!(f, "{}", mismatch),
            FailureReason::Timeout(timeout) => write!(
                f,
                "program did not complete within the provided timeout ({:?})",
                timeout
            ),
            FailureReason::Launch(message) | FailureReason::Io(message) => f.write_str(message),
        }
    }
}

impl From<RunError> for FailureReason {
    fn from(error: RunError) -> Self {
        match error {
            RunError::Timeout { timeout } => FailureReason::Timeout(timeout),
            RunError::Launch { .. } => FailureReason::Launch(error.to_string()),
            RunError::Io(_) => FailureReason::Io(error.to_string()),
        }
    }
}

/// Final verdict of a test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed(FailureReason),
}

impl TestOutcome {
    /// Check if this outcome is a pass
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }

    /// The failure reason, if any
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            TestOutcome::Passed => None,
            TestOutcome::Failed(reason) => Some(reason),
        }
    }
}

/// Lifecycle state of a test case
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TestState {
    #[default]
    Pending,
    Running,
    Finished(TestRun),
}

/// A completed test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    /// Test case name
    pub name: String,
    /// Verdict
    pub outcome: TestOutcome,
    /// Stderr captured from the program (empty if none or if it never ran)
    pub stderr: String,
    /// Wall-clock duration of the whole case
    pub duration: Duration,
}

/// Shared, read-only inputs for executing test cases
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    /// Runner for the program under test
    pub runner: &'a ProcessRunner,
    /// Output comparison mode for the suite
    pub mode: ComparisonMode,
    /// Suppress the stderr side channel
    pub hide_stderr: bool,
}

/// Executes one test case end to end
#[derive(Debug)]
pub struct TestCaseExecutor<'a> {
    case: &'a TestCase,
    state: TestState,
}

impl<'a> TestCaseExecutor<'a> {
    /// Create a pending executor for a test case
    pub fn new(case: &'a TestCase) -> Self {
        Self {
            case,
            state: TestState::Pending,
        }
    }

    /// The test case being executed
    pub fn case(&self) -> &TestCase {
        self.case
    }

    /// Current lifecycle state
    pub fn state(&self) -> &TestState {
        &self.state
    }

    /// Run the test case: normalize input, run the program, emit stderr,
    /// then validate.
    ///
    /// Executing an already finished case returns its recorded run
    /// without running the program again.
    pub fn execute(
        &mut self,
        ctx: &ExecutionContext<'_>,
        observer: &mut dyn SuiteObserver,
    ) -> TestRun {
        if let TestState::Finished(run) = &self.state {
            return run.clone();
        }

        let start = Instant::now();
        self.state = TestState::Running;

        let payload = normalize(&self.case.input);
        tracing::debug!(
            test = %self.case.name,
            input_bytes = payload.len(),
            "running test case"
        );

        let (outcome, stderr) = match ctx.runner.run(&payload) {
            Ok(result) => {
                self.emit_stderr(ctx, observer, &result.stderr);
                let outcome = match validate(&result.stdout, &self.case.output, ctx.mode) {
                    ValidationOutcome::Pass => TestOutcome::Passed,
                    ValidationOutcome::Fail(mismatch) => {
                        if result.shell_launch_failed() {
                            tracing::warn!(
                                test = %self.case.name,
                                exit_code = ?result.exit_code,
                                "shell could not run the program, check the command line"
                            );
                        }
                        TestOutcome::Failed(FailureReason::Mismatch(mismatch))
                    }
                };
                (outcome, result.stderr)
            }
            Err(error) => (TestOutcome::Failed(error.into()), String::new()),
        };

        if let TestOutcome::Failed(reason) = &outcome {
            tracing::debug!(
                test = %self.case.name,
                kind = reason.kind(),
                %reason,
                "test case failed"
            );
        }

        let run = TestRun {
            name: self.case.name.clone(),
            outcome,
            stderr,
            duration: start.elapsed(),
        };
        self.state = TestState::Finished(run.clone());
        run
    }

    fn emit_stderr(
        &self,
        ctx: &ExecutionContext<'_>,
        observer: &mut dyn SuiteObserver,
        stderr: &str,
    ) {
        if !stderr.is_empty() && !ctx.hide_stderr {
            observer.on_stderr(&self.case.name, stderr);
        }
    }
}
