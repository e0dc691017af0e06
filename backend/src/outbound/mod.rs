//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process course/roster storage and token validation.
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod memory;
