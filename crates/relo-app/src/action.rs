use relo_core::config::{AppConfig, ConnectionConfig};

/// Side effects [`crate::Session::update`] asks its driver to perform.
///
/// The session never calls the backend itself; the engine interprets these
/// in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No side-effect.
    None,
    /// Issue a backend call whose response comes back as a message.
    Request(Request),
    /// The config changed; (re)arm the debounced save.
    Persist(AppConfig),
}

/// A backend call, carrying a snapshot of the state it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadConfig,
    TestConnection {
        attempt: u64,
        connection: ConnectionConfig,
    },
    ListTrackers(ConnectionConfig),
    ScanTorrents(AppConfig),
    ExecuteReplace(AppConfig),
}
