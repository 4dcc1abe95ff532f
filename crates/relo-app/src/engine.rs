use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::task::{self, JoinSet};

use relo_core::models::{ReplaceResult, TrackerEntry};
use relo_runtime::Backend;

use crate::action::{Action, Request};
use crate::autosave::{Autosave, AUTOSAVE_DELAY};
use crate::connection::ConnectionStatus;
use crate::message::Message;
use crate::session::Session;

/// Drives a [`Session`] against a [`Backend`].
///
/// Requests run as spawned tasks whose output is the response message; the
/// session only ever sees those responses through [`Engine::pump`], one at
/// a time.
pub struct Engine<B: Backend> {
    backend: Arc<B>,
    session: Session,
    in_flight: JoinSet<Message>,
    pending: HashMap<task::Id, Pending>,
    autosave: Autosave,
}

/// What an in-flight task would have answered, kept so a task that dies
/// still produces a response.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Load,
    Test { attempt: u64 },
    Trackers,
    Scan,
    Execute,
}

impl Pending {
    fn failed(self, reason: String) -> Message {
        match self {
            Self::Load => Message::ConfigLoaded(Err(reason)),
            Self::Test { attempt } => Message::ConnectionTested {
                attempt,
                result: Err(reason),
            },
            Self::Trackers => Message::TrackersFetched(Err(reason)),
            Self::Scan => Message::ScanFinished(Err(reason)),
            Self::Execute => Message::ExecuteFinished(Err(reason)),
        }
    }
}

impl<B: Backend> Engine<B> {
    /// Must be called from within a tokio runtime.
    pub fn new(backend: B) -> Self {
        let backend = Arc::new(backend);
        let autosave = Autosave::spawn(backend.clone(), AUTOSAVE_DELAY);
        Self {
            backend,
            session: Session::new(),
            in_flight: JoinSet::new(),
            pending: HashMap::new(),
            autosave,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply one message and start whatever it asks for.
    pub fn dispatch(&mut self, msg: Message) {
        let action = self.session.update(msg);
        self.perform(action);
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Persist(config) => self.autosave.schedule(config),
            Action::Request(request) => self.spawn_request(request),
        }
    }

    fn spawn_request(&mut self, request: Request) {
        let backend = self.backend.clone();
        match request {
            Request::LoadConfig => self.spawn(Pending::Load, async move {
                Message::ConfigLoaded(backend.load_config().await.map_err(|e| e.to_string()))
            }),
            Request::TestConnection {
                attempt,
                connection,
            } => self.spawn(Pending::Test { attempt }, async move {
                let result = backend
                    .test_connection(connection)
                    .await
                    .map_err(|e| e.to_string());
                Message::ConnectionTested { attempt, result }
            }),
            Request::ListTrackers(connection) => self.spawn(Pending::Trackers, async move {
                Message::TrackersFetched(
                    backend
                        .list_trackers(connection)
                        .await
                        .map_err(|e| e.to_string()),
                )
            }),
            Request::ScanTorrents(config) => self.spawn(Pending::Scan, async move {
                Message::ScanFinished(backend.scan_torrents(config).await.map_err(|e| e.to_string()))
            }),
            Request::ExecuteReplace(config) => self.spawn(Pending::Execute, async move {
                Message::ExecuteFinished(
                    backend
                        .execute_replace(config)
                        .await
                        .map_err(|e| e.to_string()),
                )
            }),
        }
    }

    fn spawn<F>(&mut self, pending: Pending, task: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let handle = self.in_flight.spawn(task);
        self.pending.insert(handle.id(), pending);
    }

    /// Wait for the next backend response and apply it. Returns a copy of
    /// the applied message, or `None` once nothing is in flight.
    ///
    /// A task that panicked or was cancelled is answered with the failure
    /// message for its request, so the session never stays busy.
    pub async fn pump(&mut self) -> Option<Message> {
        loop {
            let (id, msg) = match self.in_flight.join_next_with_id().await? {
                Ok((id, msg)) => (id, msg),
                Err(e) => {
                    tracing::error!(error = %e, "Backend request task failed");
                    let Some(&pending) = self.pending.get(&e.id()) else {
                        continue;
                    };
                    (e.id(), pending.failed(format!("backend task failed: {e}")))
                }
            };
            self.pending.remove(&id);
            self.dispatch(msg.clone());
            return Some(msg);
        }
    }

    /// Apply responses until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.pump().await.is_some() {}
    }

    // ── Conveniences for sequential front ends ────────────────────

    /// Load the persisted config once and wait for it.
    pub async fn load(&mut self) {
        self.dispatch(Message::Load);
        self.settle().await;
    }

    pub async fn test_connection(&mut self) -> ConnectionStatus {
        self.dispatch(Message::TestConnection);
        self.settle().await;
        self.session.status()
    }

    /// Fetch the tracker catalog. `Err` carries the failure text.
    pub async fn fetch_trackers(&mut self) -> Result<Vec<TrackerEntry>, String> {
        self.dispatch(Message::BrowseTrackers);
        let mut outcome = None;
        while let Some(msg) = self.pump().await {
            if let Message::TrackersFetched(result) = msg {
                outcome = Some(result);
            }
        }
        outcome.unwrap_or_else(|| Err("a catalog fetch is already running".into()))
    }

    /// Run a scan if the session permits one. Returns false when it was
    /// gated; the result is then read from [`Session::scan_result`].
    pub async fn scan(&mut self) -> bool {
        self.dispatch(Message::Scan);
        let mut ran = false;
        while let Some(msg) = self.pump().await {
            ran |= matches!(msg, Message::ScanFinished(_));
        }
        ran
    }

    /// Execute the previewed replacements. `None` when execute was not
    /// permitted.
    pub async fn execute(&mut self) -> Option<Result<Vec<ReplaceResult>, String>> {
        self.dispatch(Message::Execute);
        let mut outcome = None;
        while let Some(msg) = self.pump().await {
            if let Message::ExecuteFinished(result) = msg {
                outcome = Some(result);
            }
        }
        outcome
    }

    /// Wait for in-flight requests, write any pending config and stop the
    /// autosave task.
    pub async fn shutdown(mut self) {
        self.settle().await;
        self.autosave.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use relo_core::config::{AppConfig, ConnectionConfig, Rule};
    use relo_core::models::ScanResult;

    use super::*;
    use crate::connection::ConnectionEdit;
    use crate::workflow::Busy;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct Failure(String);

    #[derive(Default)]
    struct StubBackend {
        stored: Option<AppConfig>,
        refuse_connection: bool,
        panic_on_scan: bool,
        saves: Mutex<Vec<AppConfig>>,
        scans: AtomicUsize,
    }

    impl Backend for StubBackend {
        type Error = Failure;

        async fn load_config(&self) -> Result<AppConfig, Failure> {
            self.stored
                .clone()
                .ok_or_else(|| Failure("no such file".into()))
        }

        async fn save_config(&self, config: AppConfig) -> Result<(), Failure> {
            self.saves.lock().unwrap().push(config);
            Ok(())
        }

        async fn test_connection(&self, connection: ConnectionConfig) -> Result<String, Failure> {
            if self.refuse_connection {
                Err(Failure(format!("connection refused: {}", connection.host)))
            } else {
                Ok("qBittorrent v4.6.2".into())
            }
        }

        async fn list_trackers(
            &self,
            _: ConnectionConfig,
        ) -> Result<Vec<TrackerEntry>, Failure> {
            Err(Failure("timed out".into()))
        }

        async fn scan_torrents(&self, _: AppConfig) -> Result<ScanResult, Failure> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if self.panic_on_scan {
                panic!("scan handler crashed");
            }
            Ok(ScanResult {
                total_torrents: 4,
                matched_torrents: 0,
                matches: Vec::new(),
            })
        }

        async fn execute_replace(&self, _: AppConfig) -> Result<Vec<ReplaceResult>, Failure> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_load_applies_stored_config() {
        let mut stored = AppConfig::default();
        stored.rules = vec![Rule::for_domain("a.com")];
        let mut engine = Engine::new(StubBackend {
            stored: Some(stored.clone()),
            ..Default::default()
        });

        engine.load().await;
        assert!(engine.session().is_loaded());
        assert_eq!(engine.session().config(), stored);
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_silently() {
        let mut engine = Engine::new(StubBackend::default());
        engine.load().await;
        assert!(engine.session().is_loaded());
        assert_eq!(engine.session().config(), AppConfig::default());
    }

    #[tokio::test]
    async fn test_connection_failure_sets_error_status() {
        let mut engine = Engine::new(StubBackend {
            refuse_connection: true,
            ..Default::default()
        });
        assert_eq!(engine.test_connection().await, ConnectionStatus::Error);
        assert_eq!(
            engine.session().status_message(),
            "connection refused: 127.0.0.1"
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_is_reported() {
        let mut engine = Engine::new(StubBackend::default());
        assert_eq!(engine.fetch_trackers().await, Err("timed out".to_string()));
        assert!(!engine.session().catalog().is_picker_open());
    }

    #[tokio::test]
    async fn test_gated_scan_does_not_reach_backend() {
        let mut engine = Engine::new(StubBackend::default());
        assert!(!engine.scan().await);
        assert_eq!(engine.backend.scans.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_match_scan_blocks_execute() {
        let mut engine = Engine::new(StubBackend::default());
        engine.dispatch(Message::RuleEdited {
            index: 0,
            edit: crate::rules::RuleEdit::OldDomain("a.com".into()),
        });
        engine.test_connection().await;
        assert!(engine.scan().await);
        assert_eq!(engine.session().scan_result().map(|r| r.total_torrents), Some(4));
        assert!(engine.execute().await.is_none());
    }

    #[tokio::test]
    async fn test_panicked_scan_returns_to_idle() {
        let mut engine = Engine::new(StubBackend {
            panic_on_scan: true,
            ..Default::default()
        });
        engine.dispatch(Message::RuleEdited {
            index: 0,
            edit: crate::rules::RuleEdit::OldDomain("a.com".into()),
        });
        engine.test_connection().await;

        assert!(engine.scan().await);
        assert_eq!(engine.session().busy(), Busy::Idle);
        assert!(engine.session().can_scan());
        assert!(engine.session().scan_result().is_none());
        assert!(engine
            .session()
            .last_failure()
            .is_some_and(|f| f.starts_with("backend task failed")));
        assert!(engine.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_last_edit() {
        let backend = StubBackend::default();
        let mut engine = Engine::new(backend);
        engine.dispatch(Message::ConnectionEdited(ConnectionEdit::Host("a".into())));
        engine.dispatch(Message::ConnectionEdited(ConnectionEdit::Host("ab".into())));
        let backend = engine.backend.clone();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(backend.saves.lock().unwrap().is_empty());

        engine.shutdown().await;
        let saves = backend.saves.lock().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].connection.host, "ab");
    }
}
