//! Dispatch counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Responder metrics.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Messages seen by the responder.
    pub messages_received: AtomicU64,
    /// Messages that resolved to a registered command.
    pub commands_dispatched: AtomicU64,
    /// Prefixed messages naming no registered command.
    pub unknown_commands: AtomicU64,
    /// Commands rejected for a wrong argument count.
    pub arity_mismatches: AtomicU64,
    /// Handlers that returned an error.
    pub handler_failures: AtomicU64,
    /// Replies handed back to the transport.
    pub replies_sent: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_dispatched(&self) {
        self.commands_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unknown_command(&self) {
        self.unknown_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn arity_mismatch(&self) {
        self.arity_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handler_failed(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reply_sent(&self) {
        self.replies_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            unknown_commands: self.unknown_commands.load(Ordering::Relaxed),
            arity_mismatches: self.arity_mismatches.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub commands_dispatched: u64,
    pub unknown_commands: u64,
    pub arity_mismatches: u64,
    pub handler_failures: u64,
    pub replies_sent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counters() {
        let metrics = Metrics::new();

        metrics.message_received();
        metrics.message_received();
        metrics.command_dispatched();
        metrics.unknown_command();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_received, 2);
        assert_eq!(snapshot.commands_dispatched, 1);
        assert_eq!(snapshot.unknown_commands, 1);
        assert_eq!(snapshot.replies_sent, 0);
    }
}
