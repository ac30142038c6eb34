//! Suite progress observation
//!
//! The suite reports progress and the stderr side channel through
//! [`SuiteObserver`], keeping rendering out of the execution engine.

use crate::executor::TestRun;
use crate::suite::Report;

/// Callbacks fired while a suite runs.
///
/// For a given test the order is always `on_test_start`, then `on_stderr`
/// (only when stderr was captured and not hidden), then `on_test_complete`.
pub trait SuiteObserver {
    /// Called before the first test, with the number of tests selected
    fn on_suite_start(&mut self, _total: usize) {}

    /// Called when a test begins
    fn on_test_start(&mut self, _name: &str) {}

    /// Called with stderr captured from the program under test
    fn on_stderr(&mut self, _name: &str, _stderr: &str) {}

    /// Called when a test reaches its verdict
    fn on_test_complete(&mut self, _run: &TestRun) {}

    /// Called after every test has run
    fn on_suite_complete(&mut self, _report: &Report) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SuiteObserver for NullObserver {}

/// A single recorded per-test event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    Stderr { name: String, stderr: String },
}

/// Observer that buffers per-test events so they can be replayed later.
///
/// Parallel runs give each test its own recorder and replay them in
/// declaration order once every test has finished.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    /// Recorded events in arrival order
    pub fn events(&self) -> &[ObserverEvent] {
        &self.events
    }

    /// Forward every recorded event to another observer
    pub fn replay(&self, target: &mut dyn SuiteObserver) {
        for event in &self.events {
            match event {
                ObserverEvent::Stderr { name, stderr } => target.on_stderr(name, stderr),
            }
        }
    }
}

impl SuiteObserver for RecordingObserver {
    fn on_stderr(&mut self, name: &str, stderr: &str) {
        self.events.push(ObserverEvent::Stderr {
            name: name.to_string(),
            stderr: stderr.to_string(),
        });
    }
}
