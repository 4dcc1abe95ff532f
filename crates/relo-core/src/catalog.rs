//! Distinct tracker domains currently in use.

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::models::{Torrent, TrackerEntry};

/// Host part of a tracker URL as reported by the URL parser.
///
/// No further normalization is applied: two spellings the parser keeps
/// distinct are counted as distinct domains.
pub fn tracker_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(str::to_string)
}

/// Count, per domain, how many torrents announce to it. A torrent with
/// several trackers on one domain counts once.
///
/// Sorted by count descending, then domain ascending.
pub fn tally_domains(torrents: &[Torrent]) -> Vec<TrackerEntry> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for torrent in torrents {
        let mut seen = HashSet::new();
        for tracker in &torrent.trackers {
            match tracker_domain(&tracker.url) {
                Some(domain) => {
                    seen.insert(domain);
                }
                None => tracing::debug!(url = %tracker.url, "Skipping unparsable tracker URL"),
            }
        }
        for domain in seen {
            *counts.entry(domain).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<TrackerEntry> = counts
        .into_iter()
        .map(|(domain, count)| TrackerEntry { domain, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tracker;

    fn torrent(hash: &str, urls: &[&str]) -> Torrent {
        Torrent {
            hash: hash.into(),
            name: hash.into(),
            trackers: urls.iter().map(|u| Tracker::new(*u)).collect(),
        }
    }

    #[test]
    fn test_tracker_domain() {
        assert_eq!(
            tracker_domain("https://tracker.example.com:443/announce").as_deref(),
            Some("tracker.example.com")
        );
        assert_eq!(
            tracker_domain("udp://open.tracker.org:1337/announce").as_deref(),
            Some("open.tracker.org")
        );
        assert_eq!(tracker_domain("not a url"), None);
    }

    #[test]
    fn test_tally_counts_each_torrent_once_per_domain() {
        let torrents = vec![
            torrent(
                "1",
                &["http://a.com/announce", "udp://a.com:6969", "http://b.com/announce"],
            ),
            torrent("2", &["http://a.com/announce"]),
            torrent("3", &["http://c.com/announce", "garbage"]),
        ];

        let entries = tally_domains(&torrents);
        assert_eq!(
            entries,
            vec![
                TrackerEntry {
                    domain: "a.com".into(),
                    count: 2
                },
                TrackerEntry {
                    domain: "b.com".into(),
                    count: 1
                },
                TrackerEntry {
                    domain: "c.com".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_tally_empty() {
        assert!(tally_domains(&[]).is_empty());
    }
}
