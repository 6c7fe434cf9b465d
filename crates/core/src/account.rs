//! Account rules.

use crate::error::CoreError;
use crate::walk::RANDOM_WALKER;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;

/// Trim a requested username and check it.
///
/// The length is measured after trimming. [`RANDOM_WALKER`] is reserved in
/// any letter case, since a walk request naming it goes to the open pool.
pub fn normalize_username(raw: &str) -> Result<String, CoreError> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Username must be {MIN_USERNAME_LEN} to {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.eq_ignore_ascii_case(RANDOM_WALKER) {
        return Err(CoreError::Validation(format!(
            "Username '{username}' is reserved"
        )));
    }
    Ok(username.to_string())
}
