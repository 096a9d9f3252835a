use serde::{Deserialize, Serialize};

use crate::enums::LogLevel;

/// Accumulates the narrative of a calculation run.
///
/// Lines are kept in memory for later export and forwarded to the `log`
/// facade. The verbosity level controls which lines the calculation chooses
/// to emit, not which lines the log retains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLog {
    level: LogLevel,
    lines: Vec<String>,
}

impl Default for TextLog {
    fn default() -> Self {
        Self {
            level: LogLevel::Low,
            lines: Vec::new(),
        }
    }
}

impl TextLog {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            lines: Vec::new(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    /// Append a line to the log.
    pub fn append(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{}", text);
        self.lines.push(text);
    }

    /// Append a line only when the log is at least as verbose as `level`.
    pub fn append_at(&mut self, level: LogLevel, text: impl Into<String>) {
        if self.level >= level {
            self.append(text);
        }
    }

    /// Record a diagnostic that should always be visible.
    pub fn diagnostic(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("{}", text);
        self.lines.push(text);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
