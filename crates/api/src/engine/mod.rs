//! Transactional orchestration of the booking rules.
//!
//! Decisions live in `petfy_core`; the functions here load the rows those
//! decisions need, hold the row locks while deciding, and write the result
//! in the same transaction. Any error drops the transaction, which rolls
//! back every write made so far.
//!
//! - [`walks`] -- walk lifecycle (create, edit, accept, start, finish, cancel).
//! - [`walkers`] -- walker applications and approval decisions.
//! - [`ratings`] -- rating submission and walker aggregate recompute.

pub mod ratings;
pub mod walkers;
pub mod walks;
