//! Rating rules: score bounds, kind resolution, rateability of a walk, and
//! the walker aggregate.

use crate::error::{CoreError, StateViolation};
use crate::status::WalkStatus;
use crate::types::DbId;

/// Lowest accepted score.
pub const MIN_SCORE: i16 = 1;

/// Highest accepted score.
pub const MAX_SCORE: i16 = 5;

/// Rating of a specific walk.
pub const KIND_WALK: &str = "walk";

/// Rating of the app itself.
pub const KIND_APP: &str = "app";

/// Maximum accepted comment length.
pub const MAX_COMMENT_LEN: usize = 1000;

/// What a rating refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingKind {
    Walk,
    App,
}

impl RatingKind {
    /// Value stored in `ratings.kind`.
    pub fn as_str(self) -> &'static str {
        match self {
            RatingKind::Walk => KIND_WALK,
            RatingKind::App => KIND_APP,
        }
    }
}

/// Validate a score and optional comment. Runs before any storage access.
pub fn validate_score(score: i32) -> Result<i16, CoreError> {
    if (i32::from(MIN_SCORE)..=i32::from(MAX_SCORE)).contains(&score) {
        // In range, so the narrowing is lossless.
        Ok(score as i16)
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate the comment length.
pub fn validate_comment(comment: Option<&str>) -> Result<(), CoreError> {
    match comment {
        Some(c) if c.chars().count() > MAX_COMMENT_LEN => Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

/// Resolve the rating kind.
///
/// An explicit `"app"` wins; `"walk"` or any walk reference means a walk
/// rating. Anything else is rejected.
pub fn resolve_kind(
    kind: Option<&str>,
    walk_id: Option<DbId>,
) -> Result<RatingKind, StateViolation> {
    let kind = kind.map(str::trim).filter(|k| !k.is_empty());
    match kind {
        Some(k) if k.eq_ignore_ascii_case(KIND_APP) => Ok(RatingKind::App),
        Some(k) if k.eq_ignore_ascii_case(KIND_WALK) => Ok(RatingKind::Walk),
        _ if walk_id.is_some() => Ok(RatingKind::Walk),
        Some(other) => Err(StateViolation::InvalidRatingKind(other.to_string())),
        None => Err(StateViolation::InvalidRatingKind(String::new())),
    }
}

/// The walk columns that decide whether `rater_id` may rate it.
#[derive(Debug, Clone, Copy)]
pub struct RateableWalk {
    pub client_id: DbId,
    pub status: WalkStatus,
    pub is_completed: bool,
    pub already_rated: bool,
}

/// Check that `rater_id` may rate `walk`.
pub fn check_walk_rateable(rater_id: DbId, walk: RateableWalk) -> Result<(), StateViolation> {
    if walk.client_id != rater_id {
        return Err(StateViolation::NotOwner);
    }
    if walk.status != WalkStatus::Finished || !walk.is_completed {
        return Err(StateViolation::WalkNotFinished);
    }
    if walk.already_rated {
        return Err(StateViolation::AlreadyRated);
    }
    Ok(())
}

/// A walker's running rating average and count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i32,
}

impl RatingAggregate {
    /// Recompute the aggregate from every walk score a walker has received.
    pub fn from_scores(scores: &[i16]) -> Self {
        if scores.is_empty() {
            return Self {
                average: 0.0,
                count: 0,
            };
        }
        let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        Self {
            average: sum as f64 / scores.len() as f64,
            count: scores.len() as i32,
        }
    }
}

/// Confirmation message returned after a rating is stored.
pub fn confirmation_message(kind: RatingKind, score: i16) -> String {
    let stars = if score == 1 { "star" } else { "stars" };
    match kind {
        RatingKind::App => format!("Thanks for rating the app with {score} {stars}!"),
        RatingKind::Walk => format!("Thanks for rating your walk with {score} {stars}!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_walk(client_id: DbId) -> RateableWalk {
        RateableWalk {
            client_id,
            status: WalkStatus::Finished,
            is_completed: true,
            already_rated: false,
        }
    }

    #[test]
    fn score_bounds() {
        assert_eq!(validate_score(1).unwrap(), 1);
        assert_eq!(validate_score(5).unwrap(), 5);
        assert!(matches!(validate_score(0), Err(CoreError::Validation(_))));
        assert!(matches!(validate_score(6), Err(CoreError::Validation(_))));
        assert!(validate_score(-3).is_err());
    }

    #[test]
    fn comment_length() {
        assert!(validate_comment(None).is_ok());
        assert!(validate_comment(Some("great walk")).is_ok());
        assert!(validate_comment(Some(&"x".repeat(MAX_COMMENT_LEN + 1))).is_err());
        assert!(validate_comment(Some(&"é".repeat(MAX_COMMENT_LEN))).is_ok());
        assert!(validate_comment(Some(&"é".repeat(MAX_COMMENT_LEN + 1))).is_err());
    }

    #[test]
    fn kind_resolution() {
        assert_eq!(resolve_kind(Some("app"), None), Ok(RatingKind::App));
        assert_eq!(resolve_kind(Some("APP"), Some(3)), Ok(RatingKind::App));
        assert_eq!(resolve_kind(Some("walk"), None), Ok(RatingKind::Walk));
        assert_eq!(resolve_kind(None, Some(3)), Ok(RatingKind::Walk));
        assert_eq!(resolve_kind(Some("other"), Some(3)), Ok(RatingKind::Walk));
        assert_eq!(
            resolve_kind(Some("other"), None),
            Err(StateViolation::InvalidRatingKind("other".into()))
        );
        assert!(resolve_kind(None, None).is_err());
    }

    #[test]
    fn only_the_client_can_rate() {
        assert_eq!(
            check_walk_rateable(2, finished_walk(1)),
            Err(StateViolation::NotOwner)
        );
        assert_eq!(check_walk_rateable(1, finished_walk(1)), Ok(()));
    }

    #[test]
    fn unfinished_walk_cannot_be_rated() {
        let walk = RateableWalk {
            status: WalkStatus::Confirmed,
            is_completed: false,
            ..finished_walk(1)
        };
        assert_eq!(
            check_walk_rateable(1, walk),
            Err(StateViolation::WalkNotFinished)
        );

        let diverged = RateableWalk {
            is_completed: false,
            ..finished_walk(1)
        };
        assert_eq!(
            check_walk_rateable(1, diverged),
            Err(StateViolation::WalkNotFinished)
        );
    }

    #[test]
    fn second_rating_is_rejected() {
        let walk = RateableWalk {
            already_rated: true,
            ..finished_walk(1)
        };
        assert_eq!(check_walk_rateable(1, walk), Err(StateViolation::AlreadyRated));
    }

    #[test]
    fn aggregate_is_the_mean() {
        let agg = RatingAggregate::from_scores(&[5, 4, 3]);
        assert_eq!(agg.count, 3);
        assert!((agg.average - 4.0).abs() < f64::EPSILON);

        let agg = RatingAggregate::from_scores(&[5, 4]);
        assert!((agg.average - 4.5).abs() < f64::EPSILON);

        assert_eq!(
            RatingAggregate::from_scores(&[]),
            RatingAggregate {
                average: 0.0,
                count: 0
            }
        );
    }

    #[test]
    fn message_distinguishes_kind() {
        assert!(confirmation_message(RatingKind::App, 5).contains("app"));
        assert!(confirmation_message(RatingKind::Walk, 1).contains("1 star!"));
    }
}
