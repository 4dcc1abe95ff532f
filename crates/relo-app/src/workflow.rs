//! Scan → review → execute.

use relo_core::models::{ReplaceResult, ScanResult};

/// Which backend call, if any, the workflow is waiting on. Scanning and
/// executing are never in flight together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Busy {
    #[default]
    Idle,
    Scanning,
    Executing,
}

#[derive(Debug, Clone, Default)]
pub struct Workflow {
    busy: Busy,
    scan_result: Option<ScanResult>,
    show_matches: bool,
    last_failure: Option<String>,
}

impl Workflow {
    pub fn busy(&self) -> Busy {
        self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy != Busy::Idle
    }

    pub fn scan_result(&self) -> Option<&ScanResult> {
        self.scan_result.as_ref()
    }

    pub fn show_matches(&self) -> bool {
        self.show_matches
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn can_scan(&self, connected: bool, active_rules: usize) -> bool {
        connected && active_rules > 0 && !self.is_busy()
    }

    pub fn can_execute(&self, connected: bool) -> bool {
        connected
            && !self.is_busy()
            && self
                .scan_result
                .as_ref()
                .is_some_and(|r| r.matched_torrents > 0)
    }

    /// Drops the previous preview before the new one is requested.
    pub fn begin_scan(&mut self) {
        self.busy = Busy::Scanning;
        self.scan_result = None;
        self.show_matches = false;
        self.last_failure = None;
    }

    pub fn finish_scan(&mut self, result: Result<ScanResult, String>) {
        self.busy = Busy::Idle;
        match result {
            Ok(scan) => self.scan_result = Some(scan),
            Err(e) => self.last_failure = Some(e),
        }
    }

    pub fn begin_execute(&mut self) {
        self.busy = Busy::Executing;
        self.last_failure = None;
    }

    /// A completed batch consumes the preview, whatever its per-item
    /// outcomes. A failed call leaves the preview in place.
    pub fn finish_execute(&mut self, result: &Result<Vec<ReplaceResult>, String>) {
        self.busy = Busy::Idle;
        match result {
            Ok(_) => {
                self.scan_result = None;
                self.show_matches = false;
            }
            Err(e) => self.last_failure = Some(e.clone()),
        }
    }

    pub fn toggle_matches(&mut self) {
        self.show_matches = !self.show_matches;
    }

    /// Remember a failure from an operation outside the scan/execute pair.
    pub fn record_failure(&mut self, error: String) {
        self.last_failure = Some(error);
    }

    pub fn clear_failure(&mut self) {
        self.last_failure = None;
    }
}
