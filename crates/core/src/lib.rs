//! Domain building blocks for the code refactoring service.
//!
//! Pure types and functions with no I/O: identifiers, the domain error,
//! the quality-analysis payload, input validation, pagination, and the
//! language-detection heuristics shared by every backend.

pub mod analysis;
pub mod error;
pub mod language;
pub mod pagination;
pub mod types;
pub mod validation;
