//! Verifier test execution engine
//!
//! Runs a program under test once per test case, feeding it the case's input
//! on stdin and checking what it writes to stdout:
//!
//! - [`normalize`]: turns declared text blocks into the stdin payload
//! - [`ProcessRunner`]: spawns the program, enforces the timeout, captures output
//! - [`validate`]: exact-order and any-order output comparison
//! - [`TestCaseExecutor`]: one case end to end
//! - [`Suite`]: every case in declaration order, aggregated into a [`Report`]
//!
//! # Example
//!
//! ```no_run
//! use verifier_config::{TestCase, TestDefinition};
//! use verifier_core::{NullObserver, Suite};
//!
//! let definition = TestDefinition {
//!     config: Default::default(),
//!     tests: vec![TestCase::new("echo", "hi", "hi")],
//! };
//! let report = Suite::new("cat", definition).run(&mut NullObserver);
//! assert!(report.was_successful());
//! ```

pub mod error;
pub mod executor;
pub mod normalize;
pub mod observer;
pub mod process;
pub mod suite;
pub mod validate;

pub use error::{RunError, RunResult};
pub use executor::{
    ExecutionContext, FailureReason, TestCaseExecutor, TestOutcome, TestRun, TestState,
};
pub use normalize::normalize;
pub use observer::{NullObserver, ObserverEvent, RecordingObserver, SuiteObserver};
pub use process::{ExecutionResult, ProcessRunner, DEFAULT_TIMEOUT};
pub use suite::{Report, Suite, SuiteOptions};
pub use validate::{validate, ComparisonMode, Mismatch, ValidationOutcome};
