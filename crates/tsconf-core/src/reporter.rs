//! Presentation hook for config changes
//!
//! The engine never formats messages for a terminal. It hands a
//! [`ChangeReport`] to a [`ChangeReporter`] and lets the caller decide how to
//! show it.

use crate::defaults::ChangeReport;
use std::path::Path;
use std::sync::Mutex;

/// Receives the changes made to a config file
pub trait ChangeReporter: Send + Sync {
    /// Called after `config_path` was rewritten with the changes in `report`
    fn report(&self, report: &ChangeReport, config_path: &Path);
}

/// Reporter that emits one tracing event per change
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ChangeReporter for TracingReporter {
    fn report(&self, report: &ChangeReport, config_path: &Path) {
        for change in &report.suggested {
            tracing::info!(
                config = %config_path.display(),
                option = %change.option,
                value = %change.value,
                "suggested compiler option applied"
            );
        }
        for change in &report.required {
            tracing::warn!(
                config = %config_path.display(),
                option = %change.option,
                value = %change.value,
                reason = change.reason.as_deref().unwrap_or_default(),
                "required compiler option enforced"
            );
        }
    }
}

/// Reporter that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ChangeReporter for SilentReporter {
    fn report(&self, _report: &ChangeReport, _config_path: &Path) {}
}

/// Reporter that keeps every report it receives, for inspection in tests
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<ChangeReport>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far
    pub fn reports(&self) -> Vec<ChangeReport> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ChangeReporter for RecordingReporter {
    fn report(&self, report: &ChangeReport, _config_path: &Path) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report.clone());
        }
    }
}
