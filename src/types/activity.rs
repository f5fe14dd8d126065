//! Last-activity stamps for positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a position was last touched.
///
/// Ledgers coming from the dashboard carry preformatted labels ("45m ago");
/// ledgers built from events carry timestamps.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum LastActivity {
    At(DateTime<Utc>),
    Label(String),
}

impl LastActivity {
    /// Relative label as of `now`.
    pub fn label(&self, now: DateTime<Utc>) -> String {
        match self {
            LastActivity::Label(label) => label.clone(),
            LastActivity::At(at) => relative_label(now.signed_duration_since(*at).num_seconds()),
        }
    }
}

impl Default for LastActivity {
    fn default() -> Self {
        LastActivity::Label(String::from("-"))
    }
}

impl From<&str> for LastActivity {
    fn from(label: &str) -> Self {
        LastActivity::Label(label.to_string())
    }
}

impl From<DateTime<Utc>> for LastActivity {
    fn from(at: DateTime<Utc>) -> Self {
        LastActivity::At(at)
    }
}

fn relative_label(elapsed_secs: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;

    // Future timestamps (clock skew) read as "just now"
    let secs = elapsed_secs.max(0);
    match secs {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{}m ago", s / MINUTE),
        s if s < DAY => format!("{}h ago", s / HOUR),
        s if s < WEEK => format!("{}d ago", s / DAY),
        s if s < MONTH => format!("{}w ago", s / WEEK),
        s => format!("{}mo ago", s / MONTH),
    }
}
