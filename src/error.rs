//! Domain error type shared by the store, managers and report logic.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KronosError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error("User not logged in")]
    NotSignedIn,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account for '{0}' already exists")]
    EmailTaken(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid date '{0}', expected d/M/yyyy")]
    DateParse(String),

    #[error("Invalid time '{0}', expected HH:mm")]
    TimeParse(String),

    #[error("End time must be after start time")]
    NegativeDuration,

    #[error("Stopwatch is already running")]
    StopwatchRunning,

    #[error("Stopwatch is not running")]
    StopwatchIdle,

    #[error("Stopwatch ran past midnight; cancel it and log each day separately")]
    StopwatchOvernight,

    #[error("No record at position {0}")]
    NoSuchRecord(usize),

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Document encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KronosError>;
