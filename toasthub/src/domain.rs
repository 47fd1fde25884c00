use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Toast identifier, unique within the process. Ids are handed out by a
/// monotonic counter, so a later toast always has a larger id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

/// How long a toast stays in the active collection before expiring on its
/// own. `Unbounded` toasts stay until removed explicitly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    Finite(Duration),
    Unbounded,
}

impl Lifetime {
    pub fn from_millis(ms: u64) -> Self {
        Lifetime::Finite(Duration::from_millis(ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub severity: Severity,
    /// Optional caption; empty when unset.
    pub title: String,
    pub message: String,
    pub lifetime: Lifetime,
    pub show_progress: bool,
    /// Percentage of lifetime left, in [0, 100]. Starts at 100 and only ever
    /// decreases while the toast is live. Not updated when `show_progress`
    /// is false or the lifetime is unbounded.
    pub remaining_pct: f32,
}

/// Per-call overrides for [`crate::ToastManager::notify`]. Unset fields fall
/// back to the manager's configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub title: Option<String>,
    pub duration: Option<Lifetime>,
    pub show_progress: Option<bool>,
}

impl ToastOptions {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration = Some(Lifetime::from_millis(ms));
        self
    }

    /// The toast never expires on its own; it stays until removed.
    pub fn unbounded(mut self) -> Self {
        self.duration = Some(Lifetime::Unbounded);
        self
    }

    pub fn show_progress(mut self, on: bool) -> Self {
        self.show_progress = Some(on);
        self
    }
}
