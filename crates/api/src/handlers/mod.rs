//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod ratings;
pub mod walkers;
pub mod walks;
