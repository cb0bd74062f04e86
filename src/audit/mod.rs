//! Structured audit logging.
//!
//! This module provides functions for emitting structured audit events
//! using the `tracing` crate under the `scanintake::audit` target. Events
//! can be captured by any tracing subscriber.

mod events;

pub use events::{
    emit_exceptions_dropped, emit_exceptions_saved, emit_normalization_event, AuditEvent,
    NormalizationAuditEvent,
};
