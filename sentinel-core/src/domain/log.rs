//! Log domain types

use serde::{Deserialize, Serialize};

/// A line of pipeline output shown to the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::now(LogLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::now(LogLevel::Error, message)
    }

    /// Render as `[HH:MM:SS] message`
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_line_uses_clock_time() {
        let entry = LogEntry {
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            level: LogLevel::Info,
            message: "Uploaded 2 entry snapshots.".to_string(),
        };

        assert_eq!(entry.display_line(), "[14:05:07] Uploaded 2 entry snapshots.");
    }
}
