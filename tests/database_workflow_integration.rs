//! Integration tests for the library workflow
//! These tests verify that shows, lists and memberships work together the
//! way the list and detail views use them.

use futures::StreamExt;
use showtrack::application::ListSelection;
use showtrack::domain::{LibraryError, ListError, Show, ShowStatus};
use showtrack::infra::app_config::AppConfig;
use showtrack::infra::db::Database;
use showtrack::state::AppState;

fn state() -> anyhow::Result<AppState> {
    Ok(AppState::new(
        Database::open_in_memory()?,
        AppConfig::default(),
    ))
}

#[tokio::test]
async fn test_full_library_workflow() -> anyhow::Result<()> {
    let state = state()?;
    let library = &state.library;

    // Default lists exist on a fresh database
    let names: Vec<String> = library
        .all_lists()
        .await?
        .into_iter()
        .map(|l| l.list_name)
        .collect();
    assert_eq!(names, vec!["Planning", "Watching", "Completed"]);

    // Save a movie from the detail view
    let mut show = Show::new(348, "Alien");
    show.release_date = Some("1979-05-25".into());
    show.runtime = Some(117);
    library.add_show_to_list("Planning", &show).await?;
    assert_eq!(library.status_for_show(348).await?, Some(ShowStatus::Planning));

    // Start watching, then finish it
    library.set_status(348, ShowStatus::Watching).await?;
    library.set_status(348, ShowStatus::Completed).await?;
    assert_eq!(library.lists_for_show(348).await?, vec!["Completed"]);

    // Rate it
    assert_eq!(library.change_rating_input(348, "9.5").await?, 9.5);

    // Copy it to a custom list
    library.lists().create_list("Sci-fi").await?;
    library.copy_show_to_list("Sci-fi", 348).await?;
    let sci_fi = library
        .watch_selection(&ListSelection::Named("Sci-fi".into()))
        .first()
        .await?;
    assert_eq!(sci_fi.len(), 1);
    assert_eq!(sci_fi[0].user_rating, 9.5);

    // Delete it from the local detail view
    library.delete_show(348).await?;
    assert!(library.lists_for_show(348).await?.is_empty());
    assert!(
        library
            .watch_selection(&ListSelection::All)
            .first()
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn test_list_view_follows_status_changes() -> anyhow::Result<()> {
    let state = state()?;
    let library = &state.library;

    let mut planning = library.watch_selection(&ListSelection::Named("Planning".into()));
    let mut watching = library.watch_selection(&ListSelection::Named("Watching".into()));
    assert!(planning.next().await.unwrap()?.is_empty());
    assert!(watching.next().await.unwrap()?.is_empty());

    library
        .add_show_to_list("Planning", &Show::new(1, "Alien"))
        .await?;
    assert_eq!(planning.next().await.unwrap()?.len(), 1);

    library.set_status(1, ShowStatus::Watching).await?;
    assert!(planning.next().await.unwrap()?.is_empty());
    assert_eq!(watching.next().await.unwrap()?[0].title, "Alien");
    Ok(())
}

#[tokio::test]
async fn test_list_errors_surface_to_callers() -> anyhow::Result<()> {
    let state = state()?;
    let library = &state.library;
    library
        .add_show_to_list("Planning", &Show::new(1, "Alien"))
        .await?;

    assert!(matches!(
        library.add_show_to_list("Missing", &Show::new(1, "Alien")).await,
        Err(LibraryError::List(ListError::NotFound(_)))
    ));
    assert!(matches!(
        library.lists().delete_list("Completed").await,
        Err(ListError::ProtectedList(_))
    ));
    assert!(matches!(
        library.copy_show_to_list("Sci-fi", 1).await,
        Err(LibraryError::List(ListError::NotFound(_)))
    ));
    assert!(matches!(
        library.move_show_to_list("Planning", "Watching", 99).await,
        Err(LibraryError::List(ListError::ShowNotFound(99)))
    ));
    Ok(())
}

#[tokio::test]
async fn test_deleting_custom_list_keeps_shows() -> anyhow::Result<()> {
    let state = state()?;
    let library = &state.library;
    library.lists().create_list("Rewatch").await?;
    library
        .add_show_to_list("Completed", &Show::new(1, "Alien"))
        .await?;
    library.copy_show_to_list("Rewatch", 1).await?;

    let mut lists_for = library.members().get_lists_for_show(1);
    assert_eq!(
        lists_for.next().await.unwrap()?,
        vec!["Completed", "Rewatch"]
    );

    assert!(library.lists().delete_list("Rewatch").await?);
    assert_eq!(lists_for.next().await.unwrap()?, vec!["Completed"]);
    assert!(library.find_show(1).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_data_survives_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("showtrack").join("db.sqlite");

    {
        let state = AppState::new(Database::open_at(path.clone())?, AppConfig::default());
        state.library.lists().create_list("Favourites").await?;
        state
            .library
            .add_show_to_list("Favourites", &Show::new(1, "Alien"))
            .await?;
    }

    let state = AppState::new(Database::open_at(path)?, AppConfig::default());
    assert_eq!(
        state.library.lists_for_show(1).await?,
        vec!["Favourites"]
    );
    assert_eq!(state.library.all_lists().await?.len(), 4);
    Ok(())
}
