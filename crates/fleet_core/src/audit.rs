//! Audit port for user-visible operation messages.
//!
//! # Responsibility
//! - Carry one human-readable line per store operation to the presentation
//!   layer, which decides how to display it.
//!
//! # Invariants
//! - The store calls `record` after every operation, success or failure.
//! - Sinks must not panic; a failing sink cannot fail the operation.

use log::info;

/// Receiver for audit lines emitted by the store.
pub trait AuditSink {
    fn record(&self, entry: &str);
}

impl<F> AuditSink for F
where
    F: Fn(&str),
{
    fn record(&self, entry: &str) {
        self(entry)
    }
}

/// Forwards audit lines to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, entry: &str) {
        info!("event=audit module=store entry={entry:?}");
    }
}

/// Discards audit lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _entry: &str) {}
}

#[cfg(test)]
mod tests {
    use super::{AuditSink, LogAuditSink, NoopAuditSink};
    use std::cell::RefCell;

    #[test]
    fn closures_act_as_sinks() {
        let entries = RefCell::new(Vec::new());
        let sink = |entry: &str| entries.borrow_mut().push(entry.to_string());
        sink.record("Deleted Vehicle #4.");
        assert_eq!(entries.borrow().as_slice(), ["Deleted Vehicle #4."]);
    }

    #[test]
    fn boxed_sinks_are_interchangeable() {
        let sinks: Vec<Box<dyn AuditSink>> = vec![Box::new(LogAuditSink), Box::new(NoopAuditSink)];
        for sink in &sinks {
            sink.record("Connected to fleet.db");
        }
    }
}
