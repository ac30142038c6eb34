//! Suite execution
//!
//! Drives every selected test case through a [`TestCaseExecutor`] and
//! aggregates the verdicts into a [`Report`]. Results are always reported in
//! declaration order, including when cases run in parallel.

use crate::executor::{ExecutionContext, TestCaseExecutor, TestRun};
use crate::observer::{RecordingObserver, SuiteObserver};
use crate::process::{ProcessRunner, DEFAULT_TIMEOUT};
use crate::validate::ComparisonMode;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use verifier_config::{TestCase, TestDefinition};

/// Options controlling a suite run
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    /// Timeout for each run of the program
    pub timeout: Duration,
    /// Suppress the stderr side channel
    pub hide_stderr: bool,
    /// Run test cases on a thread pool
    pub parallel: bool,
    /// Only run cases whose name contains this pattern
    pub filter: Option<String>,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            hide_stderr: false,
            parallel: false,
            filter: None,
        }
    }
}

/// Aggregated results of a suite run
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Per-test results in declaration order
    pub runs: Vec<TestRun>,
    /// Total wall-clock time
    pub duration: Duration,
}

impl Report {
    /// Number of tests run
    pub fn total(&self) -> usize {
        self.runs.len()
    }

    /// Number of passing tests
    pub fn passed(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_pass()).count()
    }

    /// Number of failing tests
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Failing runs in declaration order
    pub fn failures(&self) -> impl Iterator<Item = &TestRun> {
        self.runs.iter().filter(|r| !r.outcome.is_pass())
    }

    /// True when every test passed
    pub fn was_successful(&self) -> bool {
        self.failed() == 0
    }
}

/// A loaded test definition bound to a program under test
#[derive(Debug, Clone)]
pub struct Suite {
    definition: TestDefinition,
    runner: ProcessRunner,
    options: SuiteOptions,
}

impl Suite {
    /// Create a suite with default options
    pub fn new(program: impl Into<String>, definition: TestDefinition) -> Self {
        Self::with_options(program, definition, SuiteOptions::default())
    }

    /// Create a suite with explicit options
    pub fn with_options(
        program: impl Into<String>,
        definition: TestDefinition,
        options: SuiteOptions,
    ) -> Self {
        let runner = ProcessRunner::new(program).with_timeout(options.timeout);
        Self {
            definition,
            runner,
            options,
        }
    }

    /// The comparison mode configured by the definition
    pub fn mode(&self) -> ComparisonMode {
        ComparisonMode::from_settings(&self.definition.config)
    }

    /// The options for this suite
    pub fn options(&self) -> &SuiteOptions {
        &self.options
    }

    /// Test cases selected by the filter, in declaration order
    pub fn cases(&self) -> Vec<&TestCase> {
        self.definition
            .tests
            .iter()
            .filter(|case| match &self.options.filter {
                Some(pattern) => case.name.contains(pattern.as_str()),
                None => true,
            })
            .collect()
    }

    /// Run every selected test case
    pub fn run(&self, observer: &mut dyn SuiteObserver) -> Report {
        let start = Instant::now();
        let cases = self.cases();
        let ctx = ExecutionContext {
            runner: &self.runner,
            mode: self.mode(),
            hide_stderr: self.options.hide_stderr,
        };

        tracing::debug!(
            tests = cases.len(),
            mode = ctx.mode.name(),
            parallel = self.options.parallel,
            "starting suite"
        );
        observer.on_suite_start(cases.len());

        let runs = if self.options.parallel {
            Self::run_parallel(&cases, &ctx, observer)
        } else {
            Self::run_sequential(&cases, &ctx, observer)
        };

        let report = Report {
            runs,
            duration: start.elapsed(),
        };
        observer.on_suite_complete(&report);
        report
    }

    /// Run tests one after another, reporting as they finish
    fn run_sequential(
        cases: &[&TestCase],
        ctx: &ExecutionContext<'_>,
        observer: &mut dyn SuiteObserver,
    ) -> Vec<TestRun> {
        cases
            .iter()
            .map(|case| {
                observer.on_test_start(&case.name);
                let run = TestCaseExecutor::new(case).execute(ctx, &mut *observer);
                observer.on_test_complete(&run);
                run
            })
            .collect()
    }

    /// Run tests in parallel using rayon, then replay events in order
    fn run_parallel(
        cases: &[&TestCase],
        ctx: &ExecutionContext<'_>,
        observer: &mut dyn SuiteObserver,
    ) -> Vec<TestRun> {
        let completed: Vec<(TestRun, RecordingObserver)> = cases
            .par_iter()
            .map(|case| {
                let mut recorder = RecordingObserver::default();
                let run = TestCaseExecutor::new(case).execute(ctx, &mut recorder);
                (run, recorder)
            })
            .collect();

        completed
            .into_iter()
            .map(|(run, recorder)| {
                observer.on_test_start(&run.name);
                recorder.replay(&mut *observer);
                observer.on_test_complete(&run);
                run
            })
            .collect()
    }
}
