use super::dao::{ShowDao, run_blocking};
use crate::domain::{Show, ShowId, StoreError};
use crate::infra::db::live_query::observe;
use crate::infra::db::{Database, InvalidationTracker, LiveStream, ShowRepository, Table};
use async_trait::async_trait;

/// SQLite-backed [`ShowDao`].
#[derive(Clone)]
pub struct ShowStore {
    repo: ShowRepository,
    tracker: InvalidationTracker,
}

impl ShowStore {
    pub fn new(db: &Database) -> Self {
        Self {
            repo: db.show_repo(),
            tracker: db.tracker(),
        }
    }

    async fn write<F>(&self, tables: &[Table], f: F) -> Result<bool, StoreError>
    where
        F: FnOnce(ShowRepository) -> anyhow::Result<bool> + Send + 'static,
    {
        if self.tracker.is_shut_down() {
            return Err(StoreError::Closed);
        }
        let repo = self.repo.clone();
        let changed = run_blocking(move || f(repo)).await?;
        if changed {
            self.tracker.notify(tables);
        }
        Ok(changed)
    }
}

#[async_trait]
impl ShowDao for ShowStore {
    fn get_all_shows(&self) -> LiveStream<Vec<Show>> {
        let repo = self.repo.clone();
        observe(&self.tracker, &[Table::Shows], move || repo.find_all())
    }

    fn get_show(&self, show_id: ShowId) -> LiveStream<Option<Show>> {
        let repo = self.repo.clone();
        observe(&self.tracker, &[Table::Shows], move || {
            repo.find_by_id(show_id)
        })
    }

    async fn insert(&self, show: &Show) -> Result<bool, StoreError> {
        let show = show.clone();
        let inserted = self
            .write(&[Table::Shows], move |repo| repo.insert(&show))
            .await?;
        if !inserted {
            log::debug!("Show already stored, insert ignored");
        }
        Ok(inserted)
    }

    async fn update(&self, show: &Show) -> Result<bool, StoreError> {
        let show = show.clone();
        self.write(&[Table::Shows], move |repo| repo.update(&show))
            .await
    }

    async fn delete(&self, show: &Show) -> Result<bool, StoreError> {
        self.delete_by_id(show.show_id).await
    }

    async fn delete_by_id(&self, show_id: ShowId) -> Result<bool, StoreError> {
        self.write(&[Table::Shows, Table::ListShows], move |repo| {
            repo.delete(show_id)
        })
        .await
    }

    async fn update_rating(&self, show_id: ShowId, rating: f32) -> Result<bool, StoreError> {
        self.write(&[Table::Shows], move |repo| {
            repo.update_rating(show_id, rating)
        })
        .await
    }
}
