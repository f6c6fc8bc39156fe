use super::dao::{ListShowDao, UserListDao, run_blocking};
use crate::domain::{ListError, Show, ShowId, StoreError, UserList, is_default_list};
use crate::infra::db::live_query::observe;
use crate::infra::db::{
    Database, InvalidationTracker, ListShowRepository, LiveStream, MembershipChange,
    ShowRepository, Table, UserListRepository,
};
use async_trait::async_trait;

/// SQLite-backed [`UserListDao`].
#[derive(Clone)]
pub struct UserListStore {
    repo: UserListRepository,
    tracker: InvalidationTracker,
}

impl UserListStore {
    pub fn new(db: &Database) -> Self {
        Self {
            repo: db.list_repo(),
            tracker: db.tracker(),
        }
    }
}

#[async_trait]
impl UserListDao for UserListStore {
    fn get_all_lists(&self) -> LiveStream<Vec<UserList>> {
        let repo = self.repo.clone();
        observe(&self.tracker, &[Table::UserLists], move || repo.find_all())
    }

    async fn find_list(&self, list_name: &str) -> Result<Option<UserList>, StoreError> {
        let repo = self.repo.clone();
        let list_name = list_name.to_string();
        run_blocking(move || repo.find_by_name(&list_name)).await
    }

    async fn create_list(&self, list_name: &str) -> Result<UserList, ListError> {
        let name = list_name.trim().to_string();
        if name.is_empty() || name.eq_ignore_ascii_case("all") {
            return Err(ListError::InvalidName(list_name.to_string()));
        }
        if self.tracker.is_shut_down() {
            return Err(StoreError::Closed.into());
        }

        let repo = self.repo.clone();
        let lookup = name.clone();
        let created = run_blocking(move || {
            if !repo.create(&lookup)? {
                return Ok(None);
            }
            repo.find_by_name(&lookup)
        })
        .await?;

        match created {
            Some(list) => {
                log::info!("Created list {}", list.list_name);
                self.tracker.notify(&[Table::UserLists]);
                Ok(list)
            }
            None => Err(ListError::AlreadyExists(name)),
        }
    }

    async fn delete_list(&self, list_name: &str) -> Result<bool, ListError> {
        if is_default_list(list_name) {
            return Err(ListError::ProtectedList(list_name.to_string()));
        }
        if self.tracker.is_shut_down() {
            return Err(StoreError::Closed.into());
        }

        let repo = self.repo.clone();
        let name = list_name.to_string();
        let deleted = run_blocking(move || repo.delete_custom(&name)).await?;
        if deleted {
            log::info!("Deleted list {}", list_name);
            self.tracker.notify(&[Table::UserLists, Table::ListShows]);
        }
        Ok(deleted)
    }
}

/// SQLite-backed [`ListShowDao`].
#[derive(Clone)]
pub struct ListShowStore {
    repo: ListShowRepository,
    shows: ShowRepository,
    tracker: InvalidationTracker,
}

impl ListShowStore {
    pub fn new(db: &Database) -> Self {
        Self {
            repo: db.list_show_repo(),
            shows: db.show_repo(),
            tracker: db.tracker(),
        }
    }

    fn membership_result(
        &self,
        change: MembershipChange,
        list_name: &str,
        show_id: ShowId,
    ) -> Result<bool, ListError> {
        match change {
            MembershipChange::Added => {
                self.tracker.notify(&[Table::ListShows]);
                Ok(true)
            }
            MembershipChange::AlreadyMember => Ok(false),
            MembershipChange::MissingList => Err(ListError::NotFound(list_name.to_string())),
            MembershipChange::MissingShow => Err(ListError::ShowNotFound(show_id)),
        }
    }
}

#[async_trait]
impl ListShowDao for ListShowStore {
    fn get_lists_for_show(&self, show_id: ShowId) -> LiveStream<Vec<String>> {
        let repo = self.repo.clone();
        observe(&self.tracker, &[Table::ListShows, Table::UserLists], move || {
            repo.lists_for_show(show_id)
        })
    }

    fn get_shows_in_list(&self, list_name: &str) -> LiveStream<Vec<Show>> {
        let shows = self.shows.clone();
        let list_name = list_name.to_string();
        observe(&self.tracker, &[Table::Shows, Table::ListShows], move || {
            shows.find_by_list(&list_name)
        })
    }

    async fn add_show_to_list(&self, list_name: &str, show_id: ShowId) -> Result<bool, ListError> {
        if self.tracker.is_shut_down() {
            return Err(StoreError::Closed.into());
        }
        let repo = self.repo.clone();
        let name = list_name.to_string();
        let change = run_blocking(move || repo.add(&name, show_id)).await?;
        self.membership_result(change, list_name, show_id)
    }

    async fn remove_show_from_list(
        &self,
        list_name: &str,
        show_id: ShowId,
    ) -> Result<bool, StoreError> {
        if self.tracker.is_shut_down() {
            return Err(StoreError::Closed);
        }
        let repo = self.repo.clone();
        let name = list_name.to_string();
        let removed = run_blocking(move || repo.remove(&name, show_id)).await?;
        if removed {
            self.tracker.notify(&[Table::ListShows]);
        }
        Ok(removed)
    }

    async fn move_show(&self, from: &str, to: &str, show_id: ShowId) -> Result<bool, ListError> {
        self.move_show_from_any(&[from], to, show_id).await
    }

    async fn move_show_from_any(
        &self,
        from: &[&str],
        to: &str,
        show_id: ShowId,
    ) -> Result<bool, ListError> {
        if self.tracker.is_shut_down() {
            return Err(StoreError::Closed.into());
        }
        let repo = self.repo.clone();
        let sources: Vec<String> = from.iter().map(|name| name.to_string()).collect();
        let target = to.to_string();
        let change = run_blocking(move || {
            let sources: Vec<&str> = sources.iter().map(String::as_str).collect();
            repo.move_show_from_any(&sources, &target, show_id)
        })
        .await?;
        log::debug!("Move of show {} from {:?} to {}: {:?}", show_id, from, to, change);
        self.membership_result(change, to, show_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ShowDao, ShowStore};
    use futures::StreamExt;

    #[tokio::test]
    async fn test_create_and_delete_lists() -> anyhow::Result<()> {
        let db = Database::open_in_memory()?;
        let lists = UserListStore::new(&db);
        let mut all = lists.get_all_lists();
        assert_eq!(all.next().await.unwrap()?.len(), 3);

        let created = lists.create_list("  Favourites ").await?;
        assert_eq!(created.list_name, "Favourites");
        assert!(!created.is_default);
        assert_eq!(all.next().await.unwrap()?.len(), 4);

        assert!(matches!(
            lists.create_list("Favourites").await,
            Err(ListError::AlreadyExists(_))
        ));
        assert!(matches!(
            lists.create_list("   ").await,
            Err(ListError::InvalidName(_))
        ));
        assert!(matches!(
            lists.create_list("All").await,
            Err(ListError::InvalidName(_))
        ));

        assert!(lists.delete_list("Favourites").await?);
        assert_eq!(all.next().await.unwrap()?.len(), 3);
        assert!(!lists.delete_list("Favourites").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_default_lists_are_protected() -> anyhow::Result<()> {
        let db = Database::open_in_memory()?;
        let lists = UserListStore::new(&db);
        for name in ["Planning", "Watching", "Completed"] {
            assert!(matches!(
                lists.delete_list(name).await,
                Err(ListError::ProtectedList(_))
            ));
        }
        assert!(lists.find_list("Planning").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_membership_streams_follow_writes() -> anyhow::Result<()> {
        let db = Database::open_in_memory()?;
        let shows = ShowStore::new(&db);
        let members = ListShowStore::new(&db);
        shows.insert(&Show::new(1, "Alien")).await?;

        let mut lists_for = members.get_lists_for_show(1);
        let mut planning = members.get_shows_in_list("Planning");
        assert!(lists_for.next().await.unwrap()?.is_empty());
        assert!(planning.next().await.unwrap()?.is_empty());

        assert!(members.add_show_to_list("Planning", 1).await?);
        assert_eq!(lists_for.next().await.unwrap()?, vec!["Planning"]);
        assert_eq!(planning.next().await.unwrap()?[0].title, "Alien");

        assert!(members.move_show("Planning", "Watching", 1).await?);
        assert_eq!(lists_for.next().await.unwrap()?, vec!["Watching"]);
        assert!(planning.next().await.unwrap()?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_membership_errors() -> anyhow::Result<()> {
        let db = Database::open_in_memory()?;
        let shows = ShowStore::new(&db);
        let members = ListShowStore::new(&db);
        shows.insert(&Show::new(1, "Alien")).await?;

        assert!(matches!(
            members.add_show_to_list("Nope", 1).await,
            Err(ListError::NotFound(_))
        ));
        assert!(matches!(
            members.add_show_to_list("Planning", 2).await,
            Err(ListError::ShowNotFound(2))
        ));
        assert!(members.add_show_to_list("Planning", 1).await?);
        assert!(!members.add_show_to_list("Planning", 1).await?);
        assert!(members.remove_show_from_list("Planning", 1).await?);
        assert!(!members.remove_show_from_list("Planning", 1).await?);
        Ok(())
    }
}
