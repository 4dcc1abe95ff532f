use relo_core::config::AppConfig;
use relo_core::models::{ReplaceResult, ScanResult, TrackerEntry};

use crate::connection::ConnectionEdit;
use crate::rules::RuleEdit;

/// Everything that can happen to a [`crate::Session`]: user intents and
/// backend responses. Backend failures arrive as display strings.
#[derive(Debug, Clone)]
pub enum Message {
    // Config
    Load,
    ConfigLoaded(Result<AppConfig, String>),
    // Connection
    ConnectionEdited(ConnectionEdit),
    TestConnection,
    ConnectionTested {
        attempt: u64,
        result: Result<String, String>,
    },
    // Rules
    RuleEdited { index: usize, edit: RuleEdit },
    AddRule,
    RemoveRule(usize),
    // Catalog
    BrowseTrackers,
    TrackersFetched(Result<Vec<TrackerEntry>, String>),
    PickTracker(String),
    ClosePicker,
    // Workflow
    Scan,
    ScanFinished(Result<ScanResult, String>),
    ToggleMatches,
    Execute,
    ExecuteFinished(Result<Vec<ReplaceResult>, String>),
}
