use thiserror::Error;

/// Rejected quiz or deck settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("digit count must be between 1 and 3, got {0}")]
    DigitCount(u32),

    #[error("number of problems must be between 3 and 100, got {0}")]
    ProblemCount(u32),

    #[error("timer must be between 0 and 600 seconds, got {0}")]
    TimerDuration(u32),

    #[error("unknown operation '{0}', expected one of + - * /")]
    Operator(String),
}

/// Failure reported by a history store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),

    #[error("could not determine data directory")]
    NoDataDir,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
