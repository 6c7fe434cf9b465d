//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_WALKER: &str = "walker";
pub const ROLE_ADMIN: &str = "admin";
