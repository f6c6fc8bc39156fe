//! SQLite persistence (infrastructure).

pub mod database;
pub mod invalidation;
pub mod live_query;
pub mod repository;

pub use database::Database;
pub use invalidation::{InvalidationTracker, Table};
pub use live_query::LiveStream;
pub use repository::{ListShowRepository, MembershipChange, ShowRepository, UserListRepository};
