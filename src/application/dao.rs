//! Data access interfaces.
//!
//! Reads return [`LiveStream`]s that re-emit whenever the underlying rows
//! change. Writes are async: they run on the blocking pool and resolve to
//! `true` when a row was written or `false` for a silent no-op.

use crate::domain::{ListError, Show, ShowId, StoreError, UserList};
use crate::infra::db::LiveStream;
use async_trait::async_trait;

#[async_trait]
pub trait ShowDao: Send + Sync {
    /// Every stored show, ordered by id.
    fn get_all_shows(&self) -> LiveStream<Vec<Show>>;

    /// The show with `show_id`, or `None` while it does not exist.
    fn get_show(&self, show_id: ShowId) -> LiveStream<Option<Show>>;

    /// Insert, ignoring the call if the id already exists.
    async fn insert(&self, show: &Show) -> Result<bool, StoreError>;

    /// Replace all fields of an existing show.
    async fn update(&self, show: &Show) -> Result<bool, StoreError>;

    async fn delete(&self, show: &Show) -> Result<bool, StoreError>;

    async fn delete_by_id(&self, show_id: ShowId) -> Result<bool, StoreError>;

    async fn update_rating(&self, show_id: ShowId, rating: f32) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserListDao: Send + Sync {
    /// Default lists first, then custom lists by name.
    fn get_all_lists(&self) -> LiveStream<Vec<UserList>>;

    async fn find_list(&self, list_name: &str) -> Result<Option<UserList>, StoreError>;

    async fn create_list(&self, list_name: &str) -> Result<UserList, ListError>;

    async fn delete_list(&self, list_name: &str) -> Result<bool, ListError>;
}

#[async_trait]
pub trait ListShowDao: Send + Sync {
    /// Names of the lists containing the show.
    fn get_lists_for_show(&self, show_id: ShowId) -> LiveStream<Vec<String>>;

    /// Shows in `list_name`, in the order they were added.
    fn get_shows_in_list(&self, list_name: &str) -> LiveStream<Vec<Show>>;

    async fn add_show_to_list(&self, list_name: &str, show_id: ShowId) -> Result<bool, ListError>;

    async fn remove_show_from_list(
        &self,
        list_name: &str,
        show_id: ShowId,
    ) -> Result<bool, StoreError>;

    async fn move_show(&self, from: &str, to: &str, show_id: ShowId) -> Result<bool, ListError>;

    /// Leave every list in `from` and join `to`, atomically.
    async fn move_show_from_any(
        &self,
        from: &[&str],
        to: &str,
        show_id: ShowId,
    ) -> Result<bool, ListError>;
}

/// Run a repository call on the blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
