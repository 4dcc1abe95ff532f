//! Plain-text views of session state.

use std::fmt::Write;

use relo_app::catalog::CatalogItem;
use relo_app::{ConnectionStatus, RuleSet};
use relo_core::config::ConnectionConfig;
use relo_core::models::{ReplaceResult, ScanResult};

const MASK: &str = "********";

pub fn status_line(status: ConnectionStatus, message: &str) -> String {
    if message.is_empty() {
        format!("[{}]", status.label())
    } else {
        format!("[{}] {message}", status.label())
    }
}

pub fn connection(conn: &ConnectionConfig) -> String {
    let password = if conn.password.is_empty() {
        "(none)"
    } else {
        MASK
    };
    format!(
        "client:   {}\nhost:     {}\nport:     {}\nhttps:    {}\nusername: {}\npassword: {password}\nurl:      {}",
        conn.downloader_type,
        conn.host,
        conn.port,
        conn.use_https,
        conn.username,
        conn.base_url(),
    )
}

/// Rules numbered from 1, the way commands address them.
pub fn rules(rules: &RuleSet) -> String {
    let mut out = String::new();
    for (i, rule) in rules.as_slice().iter().enumerate() {
        let mark = if rule.enabled { 'x' } else { ' ' };
        let body = if rule.is_blank() {
            "(blank)".to_string()
        } else {
            format!("{} -> {}", or_dash(&rule.old_domain), or_dash(&rule.new_domain))
        };
        let _ = writeln!(out, "{:>3}. [{mark}] {body}", i + 1);
    }
    let _ = write!(out, "{} active", rules.active_count());
    out
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

pub fn catalog(items: &[CatalogItem<'_>]) -> String {
    if items.is_empty() {
        return "No trackers found.".into();
    }
    let width = items
        .iter()
        .map(|i| i.entry.count.to_string().len())
        .max()
        .unwrap_or(1);
    let mut out = String::new();
    for item in items {
        let note = if item.selectable { "" } else { "  (has rule)" };
        let _ = writeln!(
            out,
            "{:>width$}  {}{note}",
            item.entry.count, item.entry.domain
        );
    }
    out.pop();
    out
}

pub fn scan_summary(result: &ScanResult, details: bool) -> String {
    let mut out = format!(
        "Scanned {} torrents: {} match ({}%), {} tracker URL(s) to replace.",
        result.total_torrents,
        result.matched_torrents,
        result.match_percent(),
        result.replacement_count(),
    );
    if details {
        for m in &result.matches {
            let _ = write!(out, "\n  {}\n    {} -> {}", m.name, m.old_url, m.new_url);
        }
    }
    out
}

pub fn replace_results(results: &[ReplaceResult]) -> String {
    let mut out = String::new();
    for r in results {
        if r.success {
            let _ = writeln!(out, "ok    {}: {} -> {}", r.torrent_name, r.old_url, r.new_url);
        } else {
            let _ = writeln!(
                out,
                "FAIL  {}: {} ({})",
                r.torrent_name,
                r.old_url,
                r.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    let failed = results.iter().filter(|r| !r.success).count();
    let _ = write!(
        out,
        "{} replaced, {failed} failed.",
        results.len() - failed
    );
    out
}
