use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A lifecycle, rating, or registry rule rejected the operation.
    #[error(transparent)]
    State(#[from] StateViolation),
}

/// Rule violations raised by the walk lifecycle, the rating aggregator, and
/// the walker registry.
///
/// Each variant carries a stable machine code (see [`StateViolation::code`])
/// that the API layer exposes alongside the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateViolation {
    #[error("This walk was already accepted or is no longer available")]
    NotPending,

    #[error("The walk must be confirmed before it can start")]
    NotConfirmed,

    #[error("The walk must be in progress before it can finish")]
    NotInProgress,

    #[error("A walk in status '{status}' cannot be cancelled")]
    NotCancellable { status: &'static str },

    #[error("A walk in status '{status}' cannot be edited")]
    NotEditable { status: &'static str },

    #[error("This walk is assigned to another walker")]
    WrongWalker,

    #[error("Walker is not approved to accept walks")]
    WalkerNotApproved,

    #[error("Walker '{username}' not found or not approved")]
    WalkerNotFound { username: String },

    #[error("User already has a walker profile")]
    AlreadyWalker,

    #[error("This walk has already been rated")]
    AlreadyRated,

    #[error("Only finished walks can be rated")]
    WalkNotFinished,

    #[error("Only the client of a walk can rate it")]
    NotOwner,

    #[error("Invalid rating kind '{0}'. Must be 'app' or 'walk'")]
    InvalidRatingKind(String),

    #[error("A walk id is required to rate a walk")]
    MissingWalkReference,

    #[error("Cannot move walker approval from '{from}' to '{to}'")]
    InvalidApprovalTransition { from: &'static str, to: &'static str },
}

impl StateViolation {
    /// Stable upper-snake-case code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            StateViolation::NotPending => "NOT_PENDING",
            StateViolation::NotConfirmed => "NOT_CONFIRMED",
            StateViolation::NotInProgress => "NOT_IN_PROGRESS",
            StateViolation::NotCancellable { .. } => "NOT_CANCELLABLE",
            StateViolation::NotEditable { .. } => "NOT_EDITABLE",
            StateViolation::WrongWalker => "WRONG_WALKER",
            StateViolation::WalkerNotApproved => "WALKER_NOT_APPROVED",
            StateViolation::WalkerNotFound { .. } => "WALKER_NOT_FOUND",
            StateViolation::AlreadyWalker => "ALREADY_WALKER",
            StateViolation::AlreadyRated => "ALREADY_RATED",
            StateViolation::WalkNotFinished => "WALK_NOT_FINISHED",
            StateViolation::NotOwner => "NOT_OWNER",
            StateViolation::InvalidRatingKind(_) => "INVALID_RATING_KIND",
            StateViolation::MissingWalkReference => "MISSING_WALK_REFERENCE",
            StateViolation::InvalidApprovalTransition { .. } => "INVALID_APPROVAL_TRANSITION",
        }
    }
}
