use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use relo_app::{ConnectionEdit, ConnectionStatus, Engine, Message, RuleEdit};
use relo_core::config::{AppConfig, ConnectionConfig, DownloaderType, Rule};
use relo_core::models::{MatchedTorrent, ReplaceResult, ScanResult, TrackerEntry};
use relo_runtime::{Backend, Runtime};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Failure(String);

#[derive(Default)]
struct Calls {
    saves: Mutex<Vec<AppConfig>>,
    scanned_with: Mutex<Vec<AppConfig>>,
    executes: AtomicUsize,
}

/// Scripted stand-in for a download client reachable through the backend.
/// Clones share one call log.
#[derive(Default, Clone)]
struct ScriptedBackend {
    calls: Arc<Calls>,
}

fn matches(n: usize) -> Vec<MatchedTorrent> {
    (0..n)
        .map(|i| MatchedTorrent {
            hash: format!("{i:040x}"),
            name: format!("linux-distro-{i}.iso"),
            old_url: "https://old.example.com/announce".into(),
            new_url: "https://new.example.com/announce".into(),
        })
        .collect()
}

impl Backend for ScriptedBackend {
    type Error = Failure;

    async fn load_config(&self) -> Result<AppConfig, Failure> {
        Err(Failure("no config yet".into()))
    }

    async fn save_config(&self, config: AppConfig) -> Result<(), Failure> {
        self.calls.saves.lock().unwrap().push(config);
        Ok(())
    }

    async fn test_connection(&self, _: ConnectionConfig) -> Result<String, Failure> {
        Ok("qBittorrent v4.6.2".into())
    }

    async fn list_trackers(&self, _: ConnectionConfig) -> Result<Vec<TrackerEntry>, Failure> {
        Ok(vec![
            TrackerEntry {
                domain: "a.com".into(),
                count: 5,
            },
            TrackerEntry {
                domain: "b.com".into(),
                count: 2,
            },
        ])
    }

    async fn scan_torrents(&self, config: AppConfig) -> Result<ScanResult, Failure> {
        self.calls.scanned_with.lock().unwrap().push(config);
        Ok(ScanResult {
            total_torrents: 10,
            matched_torrents: 3,
            matches: matches(3),
        })
    }

    async fn execute_replace(&self, _: AppConfig) -> Result<Vec<ReplaceResult>, Failure> {
        self.calls.executes.fetch_add(1, Ordering::SeqCst);
        Ok(matches(3).iter().map(ReplaceResult::succeeded).collect())
    }
}

#[tokio::test]
async fn scan_then_execute_requires_fresh_scan() {
    let backend = ScriptedBackend::default();
    let mut engine = Engine::new(backend.clone());
    engine.load().await;

    engine.dispatch(Message::RuleEdited {
        index: 0,
        edit: RuleEdit::OldDomain("old.example.com".into()),
    });
    engine.dispatch(Message::RuleEdited {
        index: 0,
        edit: RuleEdit::NewDomain("new.example.com".into()),
    });
    assert_eq!(engine.session().active_rule_count(), 1);

    assert_eq!(engine.test_connection().await, ConnectionStatus::Connected);
    assert!(engine.scan().await);

    let scan = engine.session().scan_result().cloned().unwrap();
    assert_eq!(scan.total_torrents, 10);
    assert_eq!(scan.matched_torrents, 3);
    assert_eq!(scan.match_percent(), 30);
    assert!(engine.session().can_execute());

    let sent = backend.calls.scanned_with.lock().unwrap()[0].clone();
    assert_eq!(sent.connection, ConnectionConfig::default());
    assert_eq!(sent.rules[0].old_domain, "old.example.com");

    let results = engine.execute().await.unwrap().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.success));
    assert!(engine.session().scan_result().is_none());

    // A second execute needs a new scan first.
    assert!(engine.execute().await.is_none());
    assert_eq!(backend.calls.executes.load(Ordering::SeqCst), 1);

    engine.shutdown().await;
}

#[tokio::test]
async fn catalog_marks_used_domains() {
    let backend = ScriptedBackend::default();
    let mut engine = Engine::new(backend);
    engine.dispatch(Message::RuleEdited {
        index: 0,
        edit: RuleEdit::OldDomain("a.com".into()),
    });

    let entries = engine.fetch_trackers().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(engine.session().catalog().is_picker_open());

    let items = engine.session().catalog_items();
    assert_eq!(items[0].entry.domain, "a.com");
    assert!(!items[0].selectable);
    assert_eq!(items[1].entry.domain, "b.com");
    assert!(items[1].selectable);

    engine.dispatch(Message::PickTracker("b.com".into()));
    let rules = engine.session().rules();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.as_slice()[1], Rule::for_domain("b.com"));
    assert!(!engine.session().catalog().is_picker_open());
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_coalesce_into_one_save() {
    let backend = ScriptedBackend::default();
    let mut engine = Engine::new(backend.clone());

    for host in ["n", "na", "nas", "nas.", "nas.local"] {
        engine.dispatch(Message::ConnectionEdited(ConnectionEdit::Host(host.into())));
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    assert!(backend.calls.saves.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(800)).await;
    {
        let saves = backend.calls.saves.lock().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].connection.host, "nas.local");
    }

    engine.shutdown().await;
    assert_eq!(backend.calls.saves.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn https_toggle_on_transmission_round_trips_port() {
    let backend = ScriptedBackend::default();
    let mut engine = Engine::new(backend);

    engine.dispatch(Message::ConnectionEdited(ConnectionEdit::DownloaderType(
        DownloaderType::Transmission,
    )));
    assert_eq!(engine.session().connection().port, 9091);

    engine.dispatch(Message::ConnectionEdited(ConnectionEdit::UseHttps(true)));
    assert_eq!(engine.session().connection().port, 443);

    engine.dispatch(Message::ConnectionEdited(ConnectionEdit::UseHttps(false)));
    assert_eq!(engine.session().connection().port, 9091);
}

#[tokio::test]
async fn edits_persist_through_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackerrelo").join("config.toml");

    let mut engine = Engine::new(Runtime::with_config_path(&path));
    engine.load().await;
    engine.dispatch(Message::ConnectionEdited(ConnectionEdit::Port("8081".into())));
    engine.dispatch(Message::AddRule);
    engine.dispatch(Message::RuleEdited {
        index: 1,
        edit: RuleEdit::OldDomain("tracker.old.org".into()),
    });
    engine.shutdown().await;

    let saved = AppConfig::load_from(&path).unwrap();
    assert_eq!(saved.connection.port, 8081);
    assert_eq!(saved.rules.len(), 2);
    assert_eq!(saved.rules[1].old_domain, "tracker.old.org");

    let mut engine = Engine::new(Runtime::with_config_path(&path));
    engine.load().await;
    assert_eq!(engine.session().config(), saved);
    engine.shutdown().await;
}
