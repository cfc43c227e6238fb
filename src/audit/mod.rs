//! Audit logging for Bizdesk
//!
//! Records every create, update and delete with before/after values in an
//! append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: one log entry with timestamp, operation, entity
//!   information, and optional before/after values.
//! - `AuditLogger`: appends entries to the audit log file as JSON lines.
//! - `generate_diff`: builds a human-readable summary of changed fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use bizdesk::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(audit_log_path);
//! let entry = AuditEntry::create(
//!     EntityType::Product,
//!     product.id.short(),
//!     Some(product.name.clone()),
//!     &product,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
