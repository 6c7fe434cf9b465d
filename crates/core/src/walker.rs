//! Walker registry rules: application validation, approval transitions, and
//! the role a user holds as a consequence of its walker approval.

use crate::error::{CoreError, StateViolation};
use crate::roles::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_WALKER};
use crate::status::ApprovalStatus;

/// Maximum length of the free-text walker description.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Allowed extensions for uploaded identity documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// Validate the fields of a walker application.
pub fn validate_application(phone: &str, description: &str) -> Result<(), CoreError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    if !allowed || !(7..=15).contains(&digits) {
        return Err(CoreError::Validation(
            "Phone must contain between 7 and 15 digits".into(),
        ));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation("Description is required".into()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the original file name of an uploaded document.
pub fn validate_document_name(file_name: &str) -> Result<(), CoreError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Document must be one of: {}",
            DOCUMENT_EXTENSIONS.join(", ")
        )))
    }
}

/// Check an approval decision.
///
/// Approval is allowed from PENDING or REJECTED; rejection from PENDING or
/// APPROVED (revocation). Re-applying the current status is an error.
pub fn check_approval_transition(
    from: ApprovalStatus,
    to: ApprovalStatus,
) -> Result<(), StateViolation> {
    let allowed = matches!(
        (from, to),
        (ApprovalStatus::Pending, ApprovalStatus::Approved)
            | (ApprovalStatus::Rejected, ApprovalStatus::Approved)
            | (ApprovalStatus::Pending, ApprovalStatus::Rejected)
            | (ApprovalStatus::Approved, ApprovalStatus::Rejected)
    );
    if allowed {
        Ok(())
    } else {
        Err(StateViolation::InvalidApprovalTransition {
            from: from.label(),
            to: to.label(),
        })
    }
}

/// The role a user should hold given its walker approval status.
///
/// This is the only place that decides role changes. Admins keep their role.
pub fn role_for_approval(current_role: &str, approval: ApprovalStatus) -> &'static str {
    if current_role == ROLE_ADMIN {
        return ROLE_ADMIN;
    }
    match approval {
        ApprovalStatus::Approved => ROLE_WALKER,
        ApprovalStatus::Pending | ApprovalStatus::Rejected => ROLE_CUSTOMER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validation() {
        assert!(validate_application("+56 9 1234 5678", "I love dogs").is_ok());
        assert!(validate_application("123", "I love dogs").is_err());
        assert!(validate_application("555-abc-1234", "I love dogs").is_err());
    }

    #[test]
    fn description_is_required() {
        assert!(validate_application("5551234567", "  ").is_err());
        let long = "a".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_application("5551234567", &long).is_err());
        let accented = "ñ".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_application("5551234567", &accented).is_ok());
    }

    #[test]
    fn document_extension_whitelist() {
        assert!(validate_document_name("id.PNG").is_ok());
        assert!(validate_document_name("scan.pdf").is_ok());
        assert!(validate_document_name("script.sh").is_err());
        assert!(validate_document_name("noext").is_err());
    }

    #[test]
    fn approval_transitions() {
        use ApprovalStatus::*;
        assert!(check_approval_transition(Pending, Approved).is_ok());
        assert!(check_approval_transition(Rejected, Approved).is_ok());
        assert!(check_approval_transition(Pending, Rejected).is_ok());
        assert!(check_approval_transition(Approved, Rejected).is_ok());
        assert_eq!(
            check_approval_transition(Approved, Approved),
            Err(StateViolation::InvalidApprovalTransition {
                from: "approved",
                to: "approved"
            })
        );
        assert!(check_approval_transition(Approved, Pending).is_err());
    }

    #[test]
    fn role_follows_approval() {
        assert_eq!(role_for_approval(ROLE_CUSTOMER, ApprovalStatus::Approved), ROLE_WALKER);
        assert_eq!(role_for_approval(ROLE_WALKER, ApprovalStatus::Rejected), ROLE_CUSTOMER);
        assert_eq!(role_for_approval(ROLE_CUSTOMER, ApprovalStatus::Pending), ROLE_CUSTOMER);
        assert_eq!(role_for_approval(ROLE_ADMIN, ApprovalStatus::Approved), ROLE_ADMIN);
    }
}
