//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and each label matches
//! the seeded `name` column.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID. Returns `None` for unknown IDs.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Lowercase label used in API payloads and query strings.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            /// Parse a label (case-insensitive).
            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|s| s.label().eq_ignore_ascii_case(label))
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

define_status_enum! {
    /// Walk lifecycle status.
    WalkStatus {
        Pending = 1 => "pending",
        Confirmed = 2 => "confirmed",
        InProgress = 3 => "in_progress",
        Finished = 4 => "finished",
        Cancelled = 5 => "cancelled",
    }
}

define_status_enum! {
    /// Walker application approval status.
    ApprovalStatus {
        Pending = 1 => "pending",
        Approved = 2 => "approved",
        Rejected = 3 => "rejected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_status_ids_match_seed_data() {
        assert_eq!(WalkStatus::Pending.id(), 1);
        assert_eq!(WalkStatus::Confirmed.id(), 2);
        assert_eq!(WalkStatus::InProgress.id(), 3);
        assert_eq!(WalkStatus::Finished.id(), 4);
        assert_eq!(WalkStatus::Cancelled.id(), 5);
    }

    #[test]
    fn approval_status_ids_match_seed_data() {
        assert_eq!(ApprovalStatus::Pending.id(), 1);
        assert_eq!(ApprovalStatus::Approved.id(), 2);
        assert_eq!(ApprovalStatus::Rejected.id(), 3);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = WalkStatus::Finished.into();
        assert_eq!(id, 4);
    }

    #[test]
    fn from_id_round_trips_and_rejects_unknown() {
        for status in WalkStatus::ALL {
            assert_eq!(WalkStatus::from_id(status.id()), Some(*status));
        }
        assert_eq!(WalkStatus::from_id(0), None);
        assert_eq!(ApprovalStatus::from_id(9), None);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(WalkStatus::from_label("IN_PROGRESS"), Some(WalkStatus::InProgress));
        assert_eq!(WalkStatus::from_label(" pending "), Some(WalkStatus::Pending));
        assert_eq!(WalkStatus::from_label("done"), None);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(WalkStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(ApprovalStatus::Approved.to_string(), "approved");
    }
}
