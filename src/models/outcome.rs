use serde::Serialize;
use std::fmt;

/// Result of one scan-and-confirm attempt. Consumed immediately by the
/// booking loop to decide between stopping and the wait-and-retry cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A slot was selected and the full confirmation flow completed.
    Success { time: String },
    /// No rendered candidate satisfied the time window and colour rules.
    NoMatch,
    /// The scan or confirmation flow failed partway through.
    Error { message: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { time } => write!(f, "appointment booked at {time}"),
            Outcome::NoMatch => write!(f, "no matching appointments"),
            Outcome::Error { message } => write!(f, "booking attempt failed: {message}"),
        }
    }
}
