//! Rule matching against tracker URLs.
//!
//! Only active rules (enabled, non-blank `old_domain`) take part. Each
//! tracker URL is rewritten by the most specific active rule whose trimmed
//! `old_domain` occurs in it: the longest `old_domain`, ties broken by
//! comparing the trimmed domains. Rule order never matters. Matching is an
//! exact, case-sensitive substring test.

use std::collections::HashSet;

use crate::config::Rule;
use crate::models::{MatchedTorrent, ScanResult, Torrent};

/// Number of rules that take part in matching.
pub fn active_rule_count(rules: &[Rule]) -> usize {
    rules.iter().filter(|r| r.is_active()).count()
}

/// Rewrite a single tracker URL, or `None` if no active rule applies.
///
/// A rewrite that leaves the URL unchanged is not a match.
pub fn rewrite_url(url: &str, rules: &[Rule]) -> Option<String> {
    let (old_domain, new_domain) = rules
        .iter()
        .filter(|r| r.is_active())
        .map(|r| (r.old_domain.trim(), r.new_domain.trim()))
        .filter(|(old, _)| url.contains(old))
        .max_by(|(a_old, a_new), (b_old, b_new)| {
            a_old
                .len()
                .cmp(&b_old.len())
                .then_with(|| b_old.cmp(a_old))
                .then_with(|| b_new.cmp(a_new))
        })?;

    let new_url = url.replace(old_domain, new_domain);
    (new_url != url).then_some(new_url)
}

/// Compute every replacement the current rules would make.
pub fn plan(torrents: &[Torrent], rules: &[Rule]) -> ScanResult {
    let mut matches = Vec::new();
    for torrent in torrents {
        for tracker in &torrent.trackers {
            if let Some(new_url) = rewrite_url(&tracker.url, rules) {
                matches.push(MatchedTorrent {
                    hash: torrent.hash.clone(),
                    name: torrent.name.clone(),
                    old_url: tracker.url.clone(),
                    new_url,
                });
            }
        }
    }

    let matched_torrents = matches
        .iter()
        .map(|m| m.hash.as_str())
        .collect::<HashSet<_>>()
        .len();

    ScanResult {
        total_torrents: torrents.len(),
        matched_torrents,
        matches,
    }
}
