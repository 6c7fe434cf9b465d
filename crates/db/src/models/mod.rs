//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Response shapes where the raw row must not be exposed

pub mod rating;
pub mod user;
pub mod walk;
pub mod walker;
