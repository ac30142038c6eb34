//! Report rendering - verdict lines, failure blocks and summary

use colored::*;
use std::io::Write;
use verifier_core::{ComparisonMode, Report, SuiteObserver, TestRun};

const HEAVY_RULE: &str =
    "======================================================================";
const LIGHT_RULE: &str =
    "----------------------------------------------------------------------";

/// Streams a human-readable report as the suite runs
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Create a reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the reporter, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(text).and_then(|_| self.out.flush()) {
            tracing::debug!("failed to write report output: {}", e);
        }
    }

    fn print_failures(&mut self, report: &Report) {
        for run in report.failures() {
            let reason = run
                .outcome
                .failure()
                .map(ToString::to_string)
                .unwrap_or_default();
            self.emit(format_args!(
                "{}\n{}: {}\n{}\n{}\n\n",
                HEAVY_RULE,
                "FAIL".red().bold(),
                run.name,
                LIGHT_RULE,
                reason
            ));
        }
    }
}

impl<W: Write> SuiteObserver for TextReporter<W> {
    fn on_stderr(&mut self, name: &str, stderr: &str) {
        self.emit(format_args!("{}\n{}", name.yellow(), stderr));
        if !stderr.ends_with('\n') {
            self.emit(format_args!("\n"));
        }
    }

    fn on_test_complete(&mut self, run: &TestRun) {
        let verdict = if run.outcome.is_pass() {
            "ok".green()
        } else {
            "FAIL".red().bold()
        };
        self.emit(format_args!("{} ... {}\n", run.name, verdict));
    }

    fn on_suite_complete(&mut self, report: &Report) {
        self.emit(format_args!("\n"));
        self.print_failures(report);

        self.emit(format_args!(
            "{}\nRan {} test{} in {:.3}s\n\n",
            LIGHT_RULE,
            report.total(),
            if report.total() == 1 { "" } else { "s" },
            report.duration.as_secs_f64()
        ));

        if report.was_successful() {
            self.emit(format_args!("{}\n", "OK".green().bold()));
        } else {
            self.emit(format_args!(
                "{} (failures={})\n",
                "FAILED".red().bold(),
                report.failed()
            ));
        }
    }
}

/// Render a finished run as a single JSON document
pub fn json_report(report: &Report, mode: ComparisonMode, hide_stderr: bool) -> serde_json::Value {
    let results: Vec<_> = report
        .runs
        .iter()
        .map(|run| {
            let mut entry = serde_json::json!({
                "name": run.name,
                "passed": run.outcome.is_pass(),
                "duration_ms": run.duration.as_millis(),
            });
            if let Some(failure) = run.outcome.failure() {
                entry["kind"] = failure.kind().into();
                entry["reason"] = failure.to_string().into();
            }
            if !hide_stderr && !run.stderr.is_empty() {
                entry["stderr"] = run.stderr.clone().into();
            }
            entry
        })
        .collect();

    serde_json::json!({
        "tests": report.total(),
        "passed": report.passed(),
        "failed": report.failed(),
        "mode": mode.name(),
        "duration_ms": report.duration.as_millis(),
        "results": results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use verifier_core::{FailureReason, Mismatch, TestOutcome};

    fn make_pass(name: &str) -> TestRun {
        TestRun {
            name: name.to_string(),
            outcome: TestOutcome::Passed,
            stderr: String::new(),
            duration: Duration::from_millis(10),
        }
    }

    fn make_fail(name: &str, reason: FailureReason) -> TestRun {
        TestRun {
            name: name.to_string(),
            outcome: TestOutcome::Failed(reason),
            stderr: "boom\n".to_string(),
            duration: Duration::from_millis(20),
        }
    }

    fn render(report: &Report) -> String {
        colored::control::set_override(false);
        let mut reporter = TextReporter::new(Vec::new());
        for run in &report.runs {
            reporter.on_test_complete(run);
        }
        reporter.on_suite_complete(report);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_successful_report() {
        let report = Report {
            runs: vec![make_pass("first"), make_pass("second")],
            duration: Duration::from_millis(1234),
        };

        let expected = format!(
            "first ... ok\nsecond ... ok\n\n{}\nRan 2 tests in 1.234s\n\nOK\n",
            LIGHT_RULE
        );
        assert_eq!(render(&report), expected);
    }

    #[test]
    fn test_failed_report() {
        let report = Report {
            runs: vec![
                make_pass("first"),
                make_fail(
                    "second",
                    FailureReason::Mismatch(Mismatch::Missing {
                        line: "x".to_string(),
                    }),
                ),
            ],
            duration: Duration::from_millis(5),
        };

        let expected = format!(
            concat!(
                "first ... ok\nsecond ... FAIL\n\n",
                "{}\nFAIL: second\n{}\n'x' expected but not produced\n\n",
                "{}\nRan 2 tests in 0.005s\n\nFAILED (failures=1)\n",
            ),
            HEAVY_RULE, LIGHT_RULE, LIGHT_RULE
        );
        assert_eq!(render(&report), expected);
    }

    #[test]
    fn test_single_test_summary_is_singular() {
        let report = Report {
            runs: vec![make_pass("only")],
            duration: Duration::ZERO,
        };
        assert!(render(&report).contains("Ran 1 test in 0.000s"));
    }

    #[test]
    fn test_stderr_block_names_the_test() {
        colored::control::set_override(false);
        let mut reporter = TextReporter::new(Vec::new());
        reporter.on_stderr("noisy", "warning: x");
        reporter.on_stderr("noisy", "done\n");
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "noisy\nwarning: x\nnoisy\ndone\n");
    }

    #[test]
    fn test_json_report() {
        let report = Report {
            runs: vec![
                make_pass("first"),
                make_fail("second", FailureReason::Timeout(Duration::from_secs(1))),
            ],
            duration: Duration::from_millis(30),
        };

        let json = json_report(&report, ComparisonMode::AnyOrder, false);
        assert_eq!(json["tests"], 2);
        assert_eq!(json["passed"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["results"][0]["passed"], true);
        assert!(json["results"][0].get("reason").is_none());
        assert_eq!(json["results"][1]["kind"], "timeout");
        assert_eq!(json["results"][1]["stderr"], "boom\n");
        assert!(json["results"][1]["reason"]
            .as_str()
            .unwrap()
            .contains("did not complete"));

        let hidden = json_report(&report, ComparisonMode::ExactOrder, true);
        assert!(hidden["results"][1].get("stderr").is_none());
    }
}
