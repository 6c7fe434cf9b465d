//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use petfy_core::error::CoreError;
use petfy_core::status::{ApprovalStatus, WalkStatus};
use serde::Deserialize;

/// Optional `?status=` filter on walk listings.
#[derive(Debug, Deserialize)]
pub struct WalkStatusParams {
    pub status: Option<String>,
}

impl WalkStatusParams {
    /// Parse the label. A missing or blank value means "no filter".
    pub fn parse(&self) -> Result<Option<WalkStatus>, CoreError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(label) => WalkStatus::from_label(label)
                .map(Some)
                .ok_or_else(|| CoreError::Validation(format!("Unknown walk status '{label}'"))),
        }
    }
}

/// `?status=` filter on the admin walker listing. Defaults to pending.
#[derive(Debug, Deserialize)]
pub struct ApprovalStatusParams {
    pub status: Option<String>,
}

impl ApprovalStatusParams {
    pub fn parse(&self) -> Result<ApprovalStatus, CoreError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(ApprovalStatus::Pending),
            Some(label) => ApprovalStatus::from_label(label).ok_or_else(|| {
                CoreError::Validation(format!("Unknown approval status '{label}'"))
            }),
        }
    }
}

/// Inclusive `?start=&end=` date range for the walk history.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRangeParams {
    /// Reject ranges whose start is after their end.
    pub fn validate(&self) -> Result<(), CoreError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(CoreError::Validation(
                "start must not be after end".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_status_filter() {
        let params = WalkStatusParams {
            status: Some("In_Progress".into()),
        };
        assert_eq!(params.parse().unwrap(), Some(WalkStatus::InProgress));

        let params = WalkStatusParams { status: None };
        assert_eq!(params.parse().unwrap(), None);

        let params = WalkStatusParams {
            status: Some("lost".into()),
        };
        assert!(params.parse().is_err());
    }

    #[test]
    fn approval_filter_defaults_to_pending() {
        let params = ApprovalStatusParams { status: None };
        assert_eq!(params.parse().unwrap(), ApprovalStatus::Pending);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let params = DateRangeParams {
            start: NaiveDate::from_ymd_opt(2025, 10, 5),
            end: NaiveDate::from_ymd_opt(2025, 10, 1),
        };
        assert!(params.validate().is_err());
    }
}
