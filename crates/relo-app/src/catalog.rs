use relo_core::models::TrackerEntry;

use crate::rules::RuleSet;

/// Tracker domains last fetched from the client, offered when authoring
/// rules.
#[derive(Debug, Clone, Default)]
pub struct TrackerCatalog {
    entries: Vec<TrackerEntry>,
    fetching: bool,
    picker_open: bool,
}

/// One catalog row as presented for picking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem<'a> {
    pub entry: &'a TrackerEntry,
    /// False when some rule already has this domain as its `old_domain`.
    pub selectable: bool,
}

impl TrackerCatalog {
    pub fn entries(&self) -> &[TrackerEntry] {
        &self.entries
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    /// Returns false if a fetch is already running.
    pub fn begin_fetch(&mut self) -> bool {
        if self.fetching {
            return false;
        }
        self.fetching = true;
        true
    }

    /// A successful fetch replaces the entries and opens the picker. A failed
    /// one keeps the previous entries and leaves the picker closed.
    pub fn finish_fetch(&mut self, result: Result<Vec<TrackerEntry>, String>) -> Option<String> {
        self.fetching = false;
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.picker_open = true;
                None
            }
            Err(e) => {
                self.picker_open = false;
                Some(e)
            }
        }
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }

    pub fn items<'a>(&'a self, rules: &RuleSet) -> Vec<CatalogItem<'a>> {
        self.entries
            .iter()
            .map(|entry| CatalogItem {
                entry,
                selectable: !rules.contains_old_domain(&entry.domain),
            })
            .collect()
    }
}
