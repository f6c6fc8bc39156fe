//! Application layer (use-cases).
//!
//! Async data access objects over the SQLite repositories, and the library
//! service that coordinates them.

pub mod dao;
pub mod library;
pub mod list_store;
pub mod show_store;

pub use dao::{ListShowDao, ShowDao, UserListDao};
pub use library::{Library, ListSelection};
pub use list_store::{ListShowStore, UserListStore};
pub use show_store::ShowStore;
