//! Step-by-step reset reporting.
//!
//! A reset is a fixed pipeline of named steps, each of which may succeed,
//! fail, or have nothing to do. Rather than suppressing errors at every call
//! site, each step records its outcome here and the pipeline always runs to
//! the end; the report is the single place the "never abort, always report"
//! policy lives, and the only error channel a reset exposes.

/// Maximum number of outcome lines shown in a summary before collapsing.
const MAX_SUMMARY_LINES: usize = 8;

/// Summary text when a reset found nothing to delete or restore.
pub const NOTHING_TO_DO: &str = "nothing to do";

/// Outcome of a single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step ran and did its work.
    Completed,
    /// The step ran into at least one recorded error.
    Failed,
    /// The step had nothing to act on (missing path, absent key).
    Skipped,
}

/// Record of one executed step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// Stable step name, for logs and tests.
    pub step: &'static str,
    /// How the step ended.
    pub status: StepStatus,
    /// Human-readable outcome lines contributed to the summary.
    ///
    /// A completed step with nothing worth telling the user (e.g. a backup
    /// snapshot) records no lines.
    pub lines: Vec<String>,
}

/// Ordered collection of step outcomes for one reset run.
#[derive(Debug, Clone, Default)]
pub struct ResetReport {
    records: Vec<StepRecord>,
}

impl ResetReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step outcome with its summary lines.
    pub fn record(&mut self, step: &'static str, status: StepStatus, lines: Vec<String>) {
        log::debug!("step {step}: {status:?} ({} line(s))", lines.len());
        self.records.push(StepRecord {
            step,
            status,
            lines,
        });
    }

    /// Record a step that had nothing to act on.
    pub fn skipped(&mut self, step: &'static str) {
        self.record(step, StepStatus::Skipped, Vec::new());
    }

    /// All recorded steps, in execution order.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Status of a named step, if it was recorded.
    #[must_use]
    pub fn status_of(&self, step: &str) -> Option<StepStatus> {
        self.records
            .iter()
            .find(|r| r.step == step)
            .map(|r| r.status)
    }

    /// All summary lines, in execution order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.records.iter().flat_map(|r| r.lines.iter()).map(String::as_str)
    }

    /// True if any step recorded a failure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.status == StepStatus::Failed)
    }

    /// Human-readable multi-line summary.
    ///
    /// The first [`MAX_SUMMARY_LINES`] outcome lines are shown; anything
    /// beyond that collapses into a trailing `+N more`. An empty report
    /// yields [`NOTHING_TO_DO`].
    #[must_use]
    pub fn summary(&self) -> String {
        let lines: Vec<&str> = self.lines().collect();
        if lines.is_empty() {
            return NOTHING_TO_DO.to_string();
        }

        let mut shown: Vec<String> = lines
            .iter()
            .take(MAX_SUMMARY_LINES)
            .map(|s| (*s).to_string())
            .collect();
        if lines.len() > MAX_SUMMARY_LINES {
            shown.push(format!("+{} more", lines.len() - MAX_SUMMARY_LINES));
        }
        shown.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_nothing_to_do() {
        let report = ResetReport::new();
        assert_eq!(report.summary(), NOTHING_TO_DO);
    }

    #[test]
    fn skipped_steps_contribute_no_lines() {
        let mut report = ResetReport::new();
        report.skipped("wipe-roaming");
        report.skipped("wipe-registry");

        assert_eq!(report.summary(), NOTHING_TO_DO);
        assert_eq!(report.status_of("wipe-roaming"), Some(StepStatus::Skipped));
    }

    #[test]
    fn lines_are_reported_in_step_order() {
        let mut report = ResetReport::new();
        report.record(
            "wipe-roaming",
            StepStatus::Completed,
            vec!["AppData/JetBrains".into()],
        );
        report.record(
            "restore",
            StepStatus::Completed,
            vec!["restored: 3 item(s)".into()],
        );

        assert_eq!(report.summary(), "AppData/JetBrains\nrestored: 3 item(s)");
    }

    #[test]
    fn summary_caps_at_eight_lines() {
        let mut report = ResetReport::new();
        let lines: Vec<String> = (0..11).map(|i| format!("Local/Variant{i}")).collect();
        report.record("wipe-local", StepStatus::Completed, lines);

        let summary = report.summary();
        assert_eq!(summary.lines().count(), 9);
        assert!(summary.ends_with("+3 more"));
        assert!(summary.contains("Local/Variant7"));
        assert!(!summary.contains("Local/Variant8\n"));
    }

    #[test]
    fn exactly_eight_lines_are_not_collapsed() {
        let mut report = ResetReport::new();
        let lines: Vec<String> = (0..8).map(|i| format!("entry{i}")).collect();
        report.record("wipe-local", StepStatus::Completed, lines);

        let summary = report.summary();
        assert_eq!(summary.lines().count(), 8);
        assert!(!summary.contains("more"));
    }

    #[test]
    fn failures_are_visible() {
        let mut report = ResetReport::new();
        report.record(
            "wipe-roaming",
            StepStatus::Failed,
            vec!["error: access denied".into()],
        );

        assert!(report.has_failures());
        assert!(report.summary().contains("access denied"));
    }
}
