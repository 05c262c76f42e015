//! Activity Log and Toasts
//!
//! The two notification surfaces: a bounded log and transient toasts.

use std::collections::VecDeque;
use std::time::Duration;

/// Newest entries kept in the activity log
pub const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub time: String,
    pub message: String,
    pub level: LogLevel,
}

/// Bounded FIFO: appending past capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Append an entry, returning the evicted one if the log was full.
    pub fn push(&mut self, time: String, message: String, level: LogLevel) -> Option<LogEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(LogEntry { id: self.next_id, time, message, level });
        self.next_id += 1;
        evicted
    }

    /// Oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ========================
// Toasts
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn icon_class(self) -> &'static str {
        match self {
            ToastKind::Success => "fas fa-check-circle text-success",
            ToastKind::Error => "fas fa-exclamation-circle text-danger",
            ToastKind::Warning => "fas fa-exclamation-triangle text-warning",
            ToastKind::Info => "fas fa-info-circle text-primary",
        }
    }
}

/// Which toast element a toast is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSurface {
    General,
    AutoBid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Increases with every toast; a dismiss timer only clears its own toast
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
}
