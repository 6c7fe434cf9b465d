//! Domain rules for the Petfy booking platform.
//!
//! Everything in this crate is pure: no database handles, no I/O. The DB
//! and API layers call into these functions to decide whether a transition
//! is legal before persisting it.

pub mod account;
pub mod error;
pub mod rating;
pub mod roles;
pub mod status;
pub mod types;
pub mod walk;
pub mod walker;
