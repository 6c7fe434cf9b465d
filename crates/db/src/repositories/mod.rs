//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Plain reads and single-statement writes accept `&PgPool`; methods that
//! take part in a caller-owned transaction accept `&mut PgConnection` and
//! are called with `&mut *tx`.

pub mod rating_repo;
pub mod user_repo;
pub mod walk_repo;
pub mod walker_repo;

pub use rating_repo::RatingRepo;
pub use user_repo::UserRepo;
pub use walk_repo::WalkRepo;
pub use walker_repo::WalkerRepo;
