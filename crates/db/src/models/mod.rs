//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inbound payloads
//! - Internal write structs used by the store

pub mod feedback;
pub mod refactoring;
pub mod status;
