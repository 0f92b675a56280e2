//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod artist_repo;
pub mod notification_config_repo;
pub mod user_repo;

pub use artist_repo::ArtistRepo;
pub use notification_config_repo::NotificationConfigRepo;
pub use user_repo::UserRepo;
