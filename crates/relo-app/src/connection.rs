use relo_core::config::{default_port, ConnectionConfig, DownloaderType};

/// Outcome of the most recent connection test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Testing,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Testing => "testing",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

/// A single-field edit of the connection form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEdit {
    DownloaderType(DownloaderType),
    Host(String),
    /// Raw text from the port field.
    Port(String),
    Username(String),
    Password(String),
    UseHttps(bool),
}

/// Leading decimal digits of `input` as a port. Anything that doesn't
/// yield a valid port becomes 0 rather than being rejected.
pub fn coerce_port(input: &str) -> u16 {
    let trimmed = input.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().unwrap_or(0)
}

/// Produce the next connection from the previous one.
///
/// Changing the client type or the scheme re-derives the port from them;
/// editing the port directly never triggers that reset.
pub fn apply_edit(prev: &ConnectionConfig, edit: ConnectionEdit) -> ConnectionConfig {
    let mut next = prev.clone();
    match edit {
        ConnectionEdit::DownloaderType(kind) => {
            next.downloader_type = kind;
            next.port = default_port(kind, next.use_https);
        }
        ConnectionEdit::Host(host) => next.host = host,
        ConnectionEdit::Port(raw) => next.port = coerce_port(&raw),
        ConnectionEdit::Username(username) => next.username = username,
        ConnectionEdit::Password(password) => next.password = password,
        ConnectionEdit::UseHttps(use_https) => {
            next.use_https = use_https;
            next.port = default_port(next.downloader_type, use_https);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_port() {
        assert_eq!(coerce_port("8080"), 8080);
        assert_eq!(coerce_port(" 9091"), 9091);
        assert_eq!(coerce_port("80abc"), 80);
        assert_eq!(coerce_port("abc"), 0);
        assert_eq!(coerce_port(""), 0);
        assert_eq!(coerce_port("99999"), 0);
        assert_eq!(coerce_port("-1"), 0);
    }

    #[test]
    fn test_type_change_resets_port() {
        let conn = ConnectionConfig {
            port: 1234,
            ..ConnectionConfig::default()
        };
        let next = apply_edit(
            &conn,
            ConnectionEdit::DownloaderType(DownloaderType::Transmission),
        );
        assert_eq!(next.downloader_type, DownloaderType::Transmission);
        assert_eq!(next.port, 9091);

        let next = apply_edit(
            &next,
            ConnectionEdit::DownloaderType(DownloaderType::QBittorrent),
        );
        assert_eq!(next.port, 8080);
    }

    #[test]
    fn test_https_toggle_round_trip_on_transmission() {
        let conn = ConnectionConfig {
            downloader_type: DownloaderType::Transmission,
            port: 9091,
            ..ConnectionConfig::default()
        };
        let https = apply_edit(&conn, ConnectionEdit::UseHttps(true));
        assert_eq!(https.port, 443);
        let plain = apply_edit(&https, ConnectionEdit::UseHttps(false));
        assert_eq!(plain.port, 9091);
    }

    #[test]
    fn test_type_change_under_https_keeps_443() {
        let conn = ConnectionConfig {
            use_https: true,
            port: 443,
            ..ConnectionConfig::default()
        };
        let next = apply_edit(
            &conn,
            ConnectionEdit::DownloaderType(DownloaderType::Transmission),
        );
        assert_eq!(next.port, 443);
    }

    #[test]
    fn test_other_fields_leave_port_alone() {
        let conn = ConnectionConfig {
            port: 12345,
            ..ConnectionConfig::default()
        };
        for edit in [
            ConnectionEdit::Host("nas.local".into()),
            ConnectionEdit::Username("me".into()),
            ConnectionEdit::Password("secret".into()),
        ] {
            assert_eq!(apply_edit(&conn, edit).port, 12345);
        }
        assert_eq!(apply_edit(&conn, ConnectionEdit::Port("8081".into())).port, 8081);
    }

    #[test]
    fn test_apply_edit_does_not_touch_previous() {
        let conn = ConnectionConfig::default();
        let _ = apply_edit(&conn, ConnectionEdit::Host("elsewhere".into()));
        assert_eq!(conn.host, "127.0.0.1");
    }
}
