//! Arena-backed in-memory adapters.
//!
//! `InMemoryAcademicStore` implements the course and roster repositories over
//! one locked arena with per-relationship index sets. `InMemoryTokenValidator`
//! resolves tokens granted at runtime.

mod state;
mod store;
mod tokens;

pub use store::InMemoryAcademicStore;
pub use tokens::InMemoryTokenValidator;
