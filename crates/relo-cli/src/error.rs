use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Backend(String),

    #[error("no enabled rule has an old domain; add one with `relo rules add`")]
    NoActiveRules,

    #[error("rule {index} does not exist (there are {len})")]
    RuleIndex { index: usize, len: usize },

    #[error("cannot remove the only rule")]
    LastRule,

    #[error("a rule for {0} already exists")]
    DuplicateRule(String),

    #[error("no torrent announces to {0}")]
    UnknownDomain(String),

    #[error("nothing to change; pass at least one option")]
    NothingToChange,

    #[error("aborted")]
    Aborted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
