use reqwest::{Client, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tokio::sync::Mutex;

use relo_core::config::ConnectionConfig;
use relo_core::models::Torrent;

use super::error::TransmissionError;
use super::types::{
    NoArgs, RpcRequest, RpcResponse, SessionInfo, TorrentGetArgs, TorrentList, TrackerReplaceArgs,
    TORRENT_FIELDS,
};
use crate::traits::{http_client, TorrentClient};

const SESSION_HEADER: &str = "X-Transmission-Session-Id";

/// Transmission RPC client.
///
/// Transmission answers `409 Conflict` with a fresh session id whenever the
/// id we send is missing or stale. The id is cached and every call retries
/// once after such a renegotiation.
pub struct TransmissionClient {
    rpc_url: String,
    http: Client,
    credentials: Option<(String, String)>,
    session_id: Mutex<String>,
}

impl TransmissionClient {
    /// Build the client and negotiate the first session id.
    pub async fn connect(conn: &ConnectionConfig) -> Result<Self, TransmissionError> {
        let http = http_client(conn.use_https, false)?;
        let credentials = if conn.username.is_empty() {
            None
        } else {
            Some((conn.username.clone(), conn.password.clone()))
        };

        let client = Self {
            rpc_url: format!("{}/transmission/rpc", conn.base_url()),
            http,
            credentials,
            session_id: Mutex::new(String::new()),
        };

        let _: IgnoredAny = client.rpc("session-get", NoArgs::default()).await?;
        tracing::debug!(rpc_url = %client.rpc_url, "Transmission session established");
        Ok(client)
    }

    async fn post<A: Serialize + Sync>(
        &self,
        body: &RpcRequest<'_, A>,
    ) -> Result<Response, TransmissionError> {
        let session_id = self.session_id.lock().await.clone();
        let mut req = self
            .http
            .post(&self.rpc_url)
            .header(SESSION_HEADER, session_id)
            .json(body);
        if let Some((user, pass)) = &self.credentials {
            req = req.basic_auth(user, Some(pass));
        }
        Ok(req.send().await?)
    }

    async fn renegotiate(&self, resp: &Response) -> Result<(), TransmissionError> {
        let id = resp
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| TransmissionError::Session("409 without a session id".into()))?;
        tracing::debug!("Transmission session id renewed");
        *self.session_id.lock().await = id.to_string();
        Ok(())
    }

    /// Perform one RPC call, handling session renegotiation.
    async fn rpc<A, T>(&self, method: &str, arguments: A) -> Result<T, TransmissionError>
    where
        A: Serialize + Send + Sync,
        T: DeserializeOwned + Send,
    {
        let body = RpcRequest { method, arguments };

        let mut resp = self.post(&body).await?;
        if resp.status() == StatusCode::CONFLICT {
            self.renegotiate(&resp).await?;
            resp = self.post(&body).await?;
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status, method, "Transmission RPC HTTP error");
            return Err(TransmissionError::Api { status, message });
        }

        let envelope: RpcResponse<T> = resp
            .json()
            .await
            .map_err(|e| TransmissionError::Parse(e.to_string()))?;
        if envelope.result != "success" {
            return Err(TransmissionError::Rpc(envelope.result));
        }
        envelope
            .arguments
            .ok_or_else(|| TransmissionError::Parse(format!("{method}: missing arguments")))
    }
}

impl TorrentClient for TransmissionClient {
    type Error = TransmissionError;

    async fn test_connection(&self) -> Result<String, TransmissionError> {
        let info: SessionInfo = self.rpc("session-get", NoArgs::default()).await?;
        Ok(format!(
            "Transmission {}",
            info.version.as_deref().unwrap_or("unknown")
        ))
    }

    async fn list_torrents(&self) -> Result<Vec<Torrent>, TransmissionError> {
        let list: TorrentList = self
            .rpc(
                "torrent-get",
                TorrentGetArgs {
                    ids: None,
                    fields: TORRENT_FIELDS,
                },
            )
            .await?;
        Ok(list.torrents.into_iter().map(Torrent::from).collect())
    }

    async fn replace_tracker(
        &self,
        hash: &str,
        old_url: &str,
        new_url: &str,
    ) -> Result<(), TransmissionError> {
        // Trackers are addressed by id, so look up the current list first.
        let list: TorrentList = self
            .rpc(
                "torrent-get",
                TorrentGetArgs {
                    ids: Some(vec![hash]),
                    fields: &["hashString", "trackers"],
                },
            )
            .await?;

        let torrent = list
            .torrents
            .first()
            .ok_or_else(|| TransmissionError::NotFound(format!("torrent {hash}")))?;
        let tracker_id = torrent
            .find_tracker_id(old_url)
            .ok_or_else(|| TransmissionError::NotFound(format!("tracker {old_url}")))?;

        let _: IgnoredAny = self
            .rpc(
                "torrent-set",
                TrackerReplaceArgs {
                    ids: [hash],
                    tracker_replace: (tracker_id, new_url),
                },
            )
            .await?;
        Ok(())
    }
}
