//! Audit logging for PiggyBank
//!
//! Every stored row, paid share and rolled-back expense leaves a line in an
//! append-only JSONL log.
//!
//! The audit trail is secondary to the operation it describes: a failure to
//! write it is reported through `tracing` and never fails the request.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;

/// Append an entry if a logger is configured, warning on failure
pub fn record(logger: Option<&AuditLogger>, entry: AuditEntry) {
    let Some(logger) = logger else {
        return;
    };

    if let Err(e) = logger.log(&entry) {
        tracing::warn!(
            error = %e,
            operation = %entry.operation,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            "failed to write audit entry"
        );
    }
}
