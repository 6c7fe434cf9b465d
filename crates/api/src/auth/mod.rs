//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Sessions are stateless: nothing is stored server-side, so logout is a
//! client-side concern.

pub mod jwt;
pub mod password;
