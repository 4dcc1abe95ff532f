use relo_core::config::{AppConfig, ConnectionConfig};
use relo_core::models::ScanResult;

use crate::action::{Action, Request};
use crate::catalog::{CatalogItem, TrackerCatalog};
use crate::connection::{apply_edit, ConnectionStatus};
use crate::message::Message;
use crate::rules::RuleSet;
use crate::workflow::{Busy, Workflow};

/// The single owner of editable state. All mutation goes through
/// [`Session::update`], one message at a time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    connection: ConnectionConfig,
    rules: RuleSet,
    status: ConnectionStatus,
    status_message: String,
    test_attempt: u64,
    load_requested: bool,
    loaded: bool,
    catalog: TrackerCatalog,
    workflow: Workflow,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Snapshot of the persisted aggregate.
    pub fn config(&self) -> AppConfig {
        AppConfig {
            connection: self.connection.clone(),
            rules: self.rules.to_vec(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn active_rule_count(&self) -> usize {
        self.rules.active_count()
    }

    pub fn catalog(&self) -> &TrackerCatalog {
        &self.catalog
    }

    pub fn catalog_items(&self) -> Vec<CatalogItem<'_>> {
        self.catalog.items(&self.rules)
    }

    pub fn busy(&self) -> Busy {
        self.workflow.busy()
    }

    pub fn is_busy(&self) -> bool {
        self.workflow.is_busy()
    }

    pub fn scan_result(&self) -> Option<&ScanResult> {
        self.workflow.scan_result()
    }

    pub fn show_matches(&self) -> bool {
        self.workflow.show_matches()
    }

    /// Text of the latest failed scan, execute or catalog fetch.
    pub fn last_failure(&self) -> Option<&str> {
        self.workflow.last_failure()
    }

    pub fn can_test(&self) -> bool {
        self.status != ConnectionStatus::Testing
    }

    pub fn can_scan(&self) -> bool {
        self.workflow
            .can_scan(self.is_connected(), self.active_rule_count())
    }

    pub fn can_execute(&self) -> bool {
        self.workflow.can_execute(self.is_connected())
    }

    // ── Update ─────────────────────────────────────────────────────

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            // ── Config ──────────────────────────────────────────
            Message::Load => {
                if self.load_requested {
                    return ignored("Load");
                }
                self.load_requested = true;
                Action::Request(Request::LoadConfig)
            }
            Message::ConfigLoaded(result) => {
                match result {
                    Ok(config) => {
                        tracing::info!(rules = config.rules.len(), "Config loaded");
                        self.connection = config.connection;
                        self.rules = RuleSet::from_vec(config.rules);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load config, using defaults");
                    }
                }
                self.loaded = true;
                Action::None
            }

            // ── Connection ──────────────────────────────────────
            Message::ConnectionEdited(edit) => {
                self.connection = apply_edit(&self.connection, edit);
                self.status = ConnectionStatus::Idle;
                self.status_message.clear();
                Action::Persist(self.config())
            }
            Message::TestConnection => {
                if !self.can_test() {
                    return ignored("TestConnection");
                }
                self.test_attempt += 1;
                self.status = ConnectionStatus::Testing;
                self.status_message.clear();
                Action::Request(Request::TestConnection {
                    attempt: self.test_attempt,
                    connection: self.connection.clone(),
                })
            }
            Message::ConnectionTested { attempt, result } => {
                // An edit since the request makes the answer meaningless.
                if attempt != self.test_attempt || self.status != ConnectionStatus::Testing {
                    return ignored("ConnectionTested");
                }
                match result {
                    Ok(message) => {
                        self.status = ConnectionStatus::Connected;
                        self.status_message = message;
                    }
                    Err(e) => {
                        self.status = ConnectionStatus::Error;
                        self.status_message = e;
                    }
                }
                Action::None
            }

            // ── Rules ───────────────────────────────────────────
            Message::RuleEdited { index, edit } => {
                self.rules.update(index, edit);
                Action::Persist(self.config())
            }
            Message::AddRule => {
                self.rules.add();
                Action::Persist(self.config())
            }
            Message::RemoveRule(index) => {
                if self.rules.remove(index) {
                    Action::Persist(self.config())
                } else {
                    ignored("RemoveRule")
                }
            }

            // ── Catalog ─────────────────────────────────────────
            Message::BrowseTrackers => {
                if !self.catalog.begin_fetch() {
                    return ignored("BrowseTrackers");
                }
                self.workflow.clear_failure();
                Action::Request(Request::ListTrackers(self.connection.clone()))
            }
            Message::TrackersFetched(result) => {
                if !self.catalog.is_fetching() {
                    return ignored("TrackersFetched");
                }
                if let Some(e) = self.catalog.finish_fetch(result) {
                    tracing::warn!(error = %e, "Failed to fetch trackers");
                    self.workflow.record_failure(e);
                }
                Action::None
            }
            Message::PickTracker(domain) => {
                self.catalog.close_picker();
                if self.rules.contains_old_domain(&domain) {
                    return ignored("PickTracker");
                }
                self.rules.add_from_domain(&domain);
                Action::Persist(self.config())
            }
            Message::ClosePicker => {
                self.catalog.close_picker();
                Action::None
            }

            // ── Workflow ────────────────────────────────────────
            Message::Scan => {
                if !self.can_scan() {
                    return ignored("Scan");
                }
                self.workflow.begin_scan();
                Action::Request(Request::ScanTorrents(self.config()))
            }
            Message::ScanFinished(result) => {
                if self.workflow.busy() != Busy::Scanning {
                    return ignored("ScanFinished");
                }
                if let Err(e) = &result {
                    tracing::error!(error = %e, "Scan failed");
                }
                self.workflow.finish_scan(result);
                Action::None
            }
            Message::ToggleMatches => {
                if self.workflow.scan_result().is_some() {
                    self.workflow.toggle_matches();
                }
                Action::None
            }
            Message::Execute => {
                if !self.can_execute() {
                    return ignored("Execute");
                }
                self.workflow.begin_execute();
                Action::Request(Request::ExecuteReplace(self.config()))
            }
            Message::ExecuteFinished(result) => {
                if self.workflow.busy() != Busy::Executing {
                    return ignored("ExecuteFinished");
                }
                match &result {
                    Ok(items) => {
                        let failed = items.iter().filter(|r| !r.success).count();
                        tracing::info!(total = items.len(), failed, "Execute finished");
                    }
                    Err(e) => tracing::error!(error = %e, "Execute failed"),
                }
                self.workflow.finish_execute(&result);
                Action::None
            }
        }
    }
}

fn ignored(kind: &'static str) -> Action {
    tracing::debug!(kind, "Message not permitted in current state, ignored");
    Action::None
}
