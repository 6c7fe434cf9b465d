//! Walk lifecycle rules.
//!
//! ```text
//! PENDING ──accept──▶ CONFIRMED ──start──▶ IN_PROGRESS ──finish──▶ FINISHED
//!    │                    │
//!    └──────cancel────────┴──────────────▶ CANCELLED
//! ```
//!
//! Editing a CONFIRMED walk sends it back to PENDING so the walker has to
//! accept the new terms. FINISHED and CANCELLED are terminal.
//!
//! The functions here only decide; the engine applies the decision inside a
//! transaction that holds the walk row lock.

use chrono::NaiveTime;

use crate::error::{CoreError, StateViolation};
use crate::status::{ApprovalStatus, WalkStatus};
use crate::types::DbId;

/// Selector value that leaves the walk in the open pool.
pub const RANDOM_WALKER: &str = "random";

/// Maximum accepted length of a walk address.
pub const MAX_ADDRESS_LEN: usize = 255;

/// How the client wants a walker assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkerSelector {
    /// No walker yet; any approved walker may accept.
    Random,
    /// A specific walker, by username. Only that walker may accept.
    Named(String),
}

impl WalkerSelector {
    /// Parse the selector sent at creation time.
    ///
    /// A missing or blank value behaves like [`RANDOM_WALKER`].
    pub fn parse(raw: Option<&str>) -> Self {
        Self::parse_update(raw).unwrap_or(WalkerSelector::Random)
    }

    /// Parse the selector sent on update. `None` means "keep the current
    /// assignment".
    pub fn parse_update(raw: Option<&str>) -> Option<Self> {
        let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
        if value.eq_ignore_ascii_case(RANDOM_WALKER) {
            Some(WalkerSelector::Random)
        } else {
            Some(WalkerSelector::Named(value.to_string()))
        }
    }
}

/// The walker profile found for a named selector, if any.
#[derive(Debug, Clone, Copy)]
pub struct WalkerCandidate {
    pub walker_id: DbId,
    pub approval: ApprovalStatus,
}

/// Decide the walker to preassign for a named selector.
///
/// Unknown and unapproved walkers are rejected the same way so the caller
/// cannot probe which usernames have pending applications.
pub fn resolve_named_walker(
    username: &str,
    candidate: Option<WalkerCandidate>,
) -> Result<DbId, StateViolation> {
    match candidate {
        Some(c) if c.approval == ApprovalStatus::Approved => Ok(c.walker_id),
        _ => Err(StateViolation::WalkerNotFound {
            username: username.to_string(),
        }),
    }
}

/// Check that `acceptor` may accept a walk currently in `status` with the
/// given preassigned walker.
///
/// Checks run in this order: the walk is still pending, the acceptor is
/// approved, and a preassigned walk is only accepted by its walker.
pub fn check_accept(
    status: WalkStatus,
    preassigned: Option<DbId>,
    acceptor: WalkerCandidate,
) -> Result<(), StateViolation> {
    if status != WalkStatus::Pending {
        return Err(StateViolation::NotPending);
    }
    if acceptor.approval != ApprovalStatus::Approved {
        return Err(StateViolation::WalkerNotApproved);
    }
    match preassigned {
        Some(assigned) if assigned != acceptor.walker_id => Err(StateViolation::WrongWalker),
        _ => Ok(()),
    }
}

/// CONFIRMED -> IN_PROGRESS.
pub fn check_start(status: WalkStatus) -> Result<(), StateViolation> {
    if status == WalkStatus::Confirmed {
        Ok(())
    } else {
        Err(StateViolation::NotConfirmed)
    }
}

/// IN_PROGRESS -> FINISHED.
pub fn check_finish(status: WalkStatus) -> Result<(), StateViolation> {
    if status == WalkStatus::InProgress {
        Ok(())
    } else {
        Err(StateViolation::NotInProgress)
    }
}

/// Only walks that have not started can be cancelled.
pub fn check_cancel(status: WalkStatus) -> Result<(), StateViolation> {
    match status {
        WalkStatus::Pending | WalkStatus::Confirmed => Ok(()),
        other => Err(StateViolation::NotCancellable {
            status: other.label(),
        }),
    }
}

/// Status a walk lands in after the client edits it.
pub fn status_after_edit(status: WalkStatus) -> Result<WalkStatus, StateViolation> {
    match status {
        WalkStatus::Pending | WalkStatus::Confirmed => Ok(WalkStatus::Pending),
        other => Err(StateViolation::NotEditable {
            status: other.label(),
        }),
    }
}

/// The completion flag stored alongside the status.
pub fn is_completed(status: WalkStatus) -> bool {
    status == WalkStatus::Finished
}

/// Validate the schedule and address of a walk request.
pub fn validate_schedule(
    start_time: NaiveTime,
    end_time: NaiveTime,
    address: &str,
) -> Result<(), CoreError> {
    if address.trim().is_empty() {
        return Err(CoreError::Validation("Address is required".into()));
    }
    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(CoreError::Validation(format!(
            "Address must be at most {MAX_ADDRESS_LEN} characters"
        )));
    }
    if end_time <= start_time {
        return Err(CoreError::Validation(
            "End time must be after start time".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(walker_id: DbId) -> WalkerCandidate {
        WalkerCandidate {
            walker_id,
            approval: ApprovalStatus::Approved,
        }
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn selector_defaults_to_random() {
        assert_eq!(WalkerSelector::parse(None), WalkerSelector::Random);
        assert_eq!(WalkerSelector::parse(Some("  ")), WalkerSelector::Random);
        assert_eq!(WalkerSelector::parse(Some("Random")), WalkerSelector::Random);
        assert_eq!(
            WalkerSelector::parse(Some(" luna ")),
            WalkerSelector::Named("luna".into())
        );
    }

    #[test]
    fn update_selector_keeps_assignment_when_absent() {
        assert_eq!(WalkerSelector::parse_update(None), None);
        assert_eq!(WalkerSelector::parse_update(Some("")), None);
        assert_eq!(
            WalkerSelector::parse_update(Some("RANDOM")),
            Some(WalkerSelector::Random)
        );
    }

    #[test]
    fn named_walker_must_exist_and_be_approved() {
        assert_eq!(resolve_named_walker("rex", Some(approved(7))), Ok(7));

        let pending = WalkerCandidate {
            walker_id: 7,
            approval: ApprovalStatus::Pending,
        };
        assert_eq!(
            resolve_named_walker("rex", Some(pending)),
            Err(StateViolation::WalkerNotFound {
                username: "rex".into()
            })
        );
        assert!(resolve_named_walker("ghost", None).is_err());
    }

    #[test]
    fn open_pool_walk_accepts_any_approved_walker() {
        assert_eq!(check_accept(WalkStatus::Pending, None, approved(3)), Ok(()));
    }

    #[test]
    fn accept_requires_pending() {
        for status in [
            WalkStatus::Confirmed,
            WalkStatus::InProgress,
            WalkStatus::Finished,
            WalkStatus::Cancelled,
        ] {
            assert_eq!(
                check_accept(status, None, approved(3)),
                Err(StateViolation::NotPending)
            );
        }
    }

    #[test]
    fn preassigned_walk_rejects_other_walkers() {
        assert_eq!(
            check_accept(WalkStatus::Pending, Some(1), approved(2)),
            Err(StateViolation::WrongWalker)
        );
        assert_eq!(check_accept(WalkStatus::Pending, Some(1), approved(1)), Ok(()));
    }

    #[test]
    fn unapproved_walker_cannot_accept() {
        let rejected = WalkerCandidate {
            walker_id: 4,
            approval: ApprovalStatus::Rejected,
        };
        assert_eq!(
            check_accept(WalkStatus::Pending, None, rejected),
            Err(StateViolation::WalkerNotApproved)
        );
    }

    #[test]
    fn not_pending_wins_over_wrong_walker() {
        assert_eq!(
            check_accept(WalkStatus::Confirmed, Some(1), approved(2)),
            Err(StateViolation::NotPending)
        );
    }

    #[test]
    fn start_and_finish_follow_the_chain() {
        assert_eq!(check_start(WalkStatus::Confirmed), Ok(()));
        assert_eq!(check_start(WalkStatus::Pending), Err(StateViolation::NotConfirmed));
        assert_eq!(check_finish(WalkStatus::InProgress), Ok(()));
        for status in [
            WalkStatus::Pending,
            WalkStatus::Confirmed,
            WalkStatus::Finished,
            WalkStatus::Cancelled,
        ] {
            assert_eq!(check_finish(status), Err(StateViolation::NotInProgress));
        }
    }

    #[test]
    fn cancel_only_before_start() {
        assert!(check_cancel(WalkStatus::Pending).is_ok());
        assert!(check_cancel(WalkStatus::Confirmed).is_ok());
        assert_eq!(
            check_cancel(WalkStatus::Finished),
            Err(StateViolation::NotCancellable { status: "finished" })
        );
        assert!(check_cancel(WalkStatus::InProgress).is_err());
        assert!(check_cancel(WalkStatus::Cancelled).is_err());
    }

    #[test]
    fn editing_confirmed_walk_reverts_to_pending() {
        assert_eq!(status_after_edit(WalkStatus::Confirmed), Ok(WalkStatus::Pending));
        assert_eq!(status_after_edit(WalkStatus::Pending), Ok(WalkStatus::Pending));
        assert!(status_after_edit(WalkStatus::InProgress).is_err());
    }

    #[test]
    fn completion_flag_tracks_finished_only() {
        for status in WalkStatus::ALL {
            assert_eq!(is_completed(*status), *status == WalkStatus::Finished);
        }
    }

    #[test]
    fn schedule_validation() {
        assert!(validate_schedule(t(9, 0), t(10, 0), "Calle 1").is_ok());
        assert!(validate_schedule(t(10, 0), t(10, 0), "Calle 1").is_err());
        assert!(validate_schedule(t(9, 0), t(10, 0), "   ").is_err());
        let long = "x".repeat(MAX_ADDRESS_LEN + 1);
        assert!(validate_schedule(t(9, 0), t(10, 0), &long).is_err());
    }

    #[test]
    fn address_limit_counts_characters() {
        let at_limit = "ñ".repeat(MAX_ADDRESS_LEN);
        assert!(validate_schedule(t(9, 0), t(10, 0), &at_limit).is_ok());
        let over = "ñ".repeat(MAX_ADDRESS_LEN + 1);
        assert!(validate_schedule(t(9, 0), t(10, 0), &over).is_err());
    }
}
