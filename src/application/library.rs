//! List management on top of the DAOs: adding shows to lists, status
//! changes, ratings and deletion.

use super::dao::{ListShowDao, ShowDao, UserListDao};
use crate::domain::format::{parse_rating_input, validate_rating};
use crate::domain::{
    DEFAULT_LISTS, LibraryError, ListError, Show, ShowId, ShowStatus, StoreError, UserList,
    is_default_list,
};
use crate::infra::db::LiveStream;
use futures::{Stream, StreamExt};
use std::str::FromStr;
use std::sync::Arc;

/// Which shows the list view displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListSelection {
    /// Every stored show.
    #[default]
    All,
    Named(String),
}

impl FromStr for ListSelection {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Named(s.to_string()))
        }
    }
}

#[derive(Clone)]
pub struct Library {
    shows: Arc<dyn ShowDao>,
    lists: Arc<dyn UserListDao>,
    members: Arc<dyn ListShowDao>,
}

impl Library {
    pub fn new(
        shows: Arc<dyn ShowDao>,
        lists: Arc<dyn UserListDao>,
        members: Arc<dyn ListShowDao>,
    ) -> Self {
        Self {
            shows,
            lists,
            members,
        }
    }

    pub fn shows(&self) -> &Arc<dyn ShowDao> {
        &self.shows
    }

    pub fn lists(&self) -> &Arc<dyn UserListDao> {
        &self.lists
    }

    pub fn members(&self) -> &Arc<dyn ListShowDao> {
        &self.members
    }

    /// Current state of a show.
    pub async fn find_show(&self, show_id: ShowId) -> Result<Option<Show>, StoreError> {
        self.shows.get_show(show_id).first().await
    }

    pub async fn all_lists(&self) -> Result<Vec<UserList>, StoreError> {
        self.lists.get_all_lists().first().await
    }

    pub async fn lists_for_show(&self, show_id: ShowId) -> Result<Vec<String>, StoreError> {
        self.members.get_lists_for_show(show_id).first().await
    }

    pub fn watch_selection(&self, selection: &ListSelection) -> LiveStream<Vec<Show>> {
        match selection {
            ListSelection::All => self.shows.get_all_shows(),
            ListSelection::Named(name) => self.members.get_shows_in_list(name),
        }
    }

    /// Store the show if needed and put it in `list_name`.
    ///
    /// A show has at most one status: adding it to a status list moves it
    /// out of the status list it was in. Nothing is stored when the list
    /// does not exist.
    pub async fn add_show_to_list(&self, list_name: &str, show: &Show) -> Result<bool, LibraryError> {
        if self.lists.find_list(list_name).await?.is_none() {
            return Err(ListError::NotFound(list_name.to_string()).into());
        }

        let inserted = self.shows.insert(show).await?;
        if inserted {
            log::info!("Saved show {} ({})", show.show_id, show.title);
        }

        if let Some(status) = ShowStatus::from_list_name(list_name) {
            let changed = self.set_status(show.show_id, status).await?;
            return Ok(inserted || changed);
        }

        let added = self.members.add_show_to_list(list_name, show.show_id).await?;
        Ok(inserted || added)
    }

    /// Put the show in the status list for `status` and take it out of
    /// every other status list, in one transaction.
    pub async fn set_status(&self, show_id: ShowId, status: ShowStatus) -> Result<bool, LibraryError> {
        self.move_into_status(&[], show_id, status).await
    }

    /// Move between lists. Moving into a status list also leaves every
    /// other status list.
    pub async fn move_show_to_list(
        &self,
        from: &str,
        to: &str,
        show_id: ShowId,
    ) -> Result<bool, LibraryError> {
        match ShowStatus::from_list_name(to) {
            Some(status) => self.move_into_status(&[from], show_id, status).await,
            None => Ok(self.members.move_show(from, to, show_id).await?),
        }
    }

    async fn move_into_status(
        &self,
        extra_sources: &[&str],
        show_id: ShowId,
        status: ShowStatus,
    ) -> Result<bool, LibraryError> {
        let sources: Vec<&str> = DEFAULT_LISTS
            .iter()
            .copied()
            .chain(extra_sources.iter().copied())
            .collect();
        let changed = self
            .members
            .move_show_from_any(&sources, status.list_name(), show_id)
            .await?;
        if changed {
            log::info!("Show {} is now {}", show_id, status);
        }
        Ok(changed)
    }

    /// Copy into a custom list; status lists go through [`Library::set_status`].
    pub async fn copy_show_to_list(&self, list_name: &str, show_id: ShowId) -> Result<bool, LibraryError> {
        if is_default_list(list_name) {
            return Err(ListError::StatusList(list_name.to_string()).into());
        }
        Ok(self.members.add_show_to_list(list_name, show_id).await?)
    }

    pub async fn remove_show_from_list(
        &self,
        list_name: &str,
        show_id: ShowId,
    ) -> Result<bool, LibraryError> {
        Ok(self
            .members
            .remove_show_from_list(list_name, show_id)
            .await?)
    }

    /// Set the user rating. Returns the stored value, rounded to one decimal.
    pub async fn change_rating(&self, show_id: ShowId, rating: f32) -> Result<f32, LibraryError> {
        let rating = validate_rating(rating)?;
        if !self.shows.update_rating(show_id, rating).await? {
            return Err(LibraryError::ShowNotFound(show_id));
        }
        Ok(rating)
    }

    /// Like [`Library::change_rating`] for text typed by the user.
    pub async fn change_rating_input(&self, show_id: ShowId, input: &str) -> Result<f32, LibraryError> {
        let rating = parse_rating_input(input)?;
        self.change_rating(show_id, rating).await
    }

    /// Remove the show and every list membership.
    pub async fn delete_show(&self, show_id: ShowId) -> Result<bool, LibraryError> {
        let deleted = self.shows.delete_by_id(show_id).await?;
        if deleted {
            log::info!("Deleted show {}", show_id);
        }
        Ok(deleted)
    }

    pub async fn status_for_show(&self, show_id: ShowId) -> Result<Option<ShowStatus>, StoreError> {
        let lists = self.lists_for_show(show_id).await?;
        Ok(ShowStatus::from_memberships(&lists))
    }

    /// Live status of a show, re-emitted when its memberships change.
    pub fn watch_status(
        &self,
        show_id: ShowId,
    ) -> impl Stream<Item = Result<Option<ShowStatus>, StoreError>> + Send + use<> {
        self.members
            .get_lists_for_show(show_id)
            .map(|lists| lists.map(|names| ShowStatus::from_memberships(&names)))
    }
}
