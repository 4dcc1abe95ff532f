use relo_core::config::Rule;
use relo_core::replace::active_rule_count;

/// A single-field edit of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEdit {
    OldDomain(String),
    NewDomain(String),
    Enabled(bool),
}

/// Ordered, never-empty list of replacement rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: vec![Rule::blank()],
        }
    }
}

impl RuleSet {
    /// An empty list becomes a single blank rule.
    pub fn from_vec(rules: Vec<Rule>) -> Self {
        if rules.is_empty() {
            Self::default()
        } else {
            Self { rules }
        }
    }

    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    pub fn to_vec(&self) -> Vec<Rule> {
        self.rules.clone()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Replace one field of the rule at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range. Callers only ever address rules they
    /// were shown.
    pub fn update(&mut self, index: usize, edit: RuleEdit) {
        let rule = &mut self.rules[index];
        match edit {
            RuleEdit::OldDomain(value) => rule.old_domain = value,
            RuleEdit::NewDomain(value) => rule.new_domain = value,
            RuleEdit::Enabled(value) => rule.enabled = value,
        }
    }

    /// Append a blank enabled rule.
    pub fn add(&mut self) {
        self.rules.push(Rule::blank());
    }

    /// Remove the rule at `index`. The last remaining rule is never removed,
    /// and an out-of-range index does nothing. Returns whether a rule was
    /// removed.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.rules.len() <= 1 || index >= self.rules.len() {
            return false;
        }
        self.rules.remove(index);
        true
    }

    /// Fill the first fully blank rule with `domain`, or append a new rule
    /// for it when there is none.
    pub fn add_from_domain(&mut self, domain: &str) {
        match self.rules.iter_mut().find(|r| r.is_blank()) {
            Some(rule) => rule.old_domain = domain.to_string(),
            None => self.rules.push(Rule::for_domain(domain)),
        }
    }

    pub fn active_count(&self) -> usize {
        active_rule_count(&self.rules)
    }

    /// Exact comparison against every rule's `old_domain`.
    pub fn contains_old_domain(&self, domain: &str) -> bool {
        self.rules.iter().any(|r| r.old_domain == domain)
    }
}
