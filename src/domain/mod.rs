//! Domain types for Showtrack
//! Defines the shows, lists and derived statuses used throughout the library.

pub mod error;
pub mod format;
pub mod list;
pub mod show;

pub use error::*;
pub use list::*;
pub use show::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_show_status_display_parse() {
        assert_eq!(ShowStatus::Watching.to_string(), "Watching");
        assert_eq!(
            ShowStatus::from_str("COMPLETED").unwrap(),
            ShowStatus::Completed
        );
        assert!(ShowStatus::from_str("dropped").is_err());
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(
            ShowStatus::from_memberships(&["Planning", "Completed", "Watching"]),
            Some(ShowStatus::Completed)
        );
        assert_eq!(
            ShowStatus::from_memberships(&["Favourites", "Watching"]),
            Some(ShowStatus::Watching)
        );
        assert_eq!(
            ShowStatus::from_memberships(&["Planning"]),
            Some(ShowStatus::Planning)
        );
        assert_eq!(ShowStatus::from_memberships(&["Favourites"]), None);
        assert_eq!(ShowStatus::from_memberships::<&str>(&[]), None);
    }

    #[test]
    fn test_default_lists() {
        assert!(is_default_list("Planning"));
        assert!(is_default_list("Completed"));
        assert!(!is_default_list("planning"));
        assert!(!is_default_list("Favourites"));
    }

    #[test]
    fn test_show_new_defaults() {
        let show = Show::new(42, "Heat");
        assert_eq!(show.show_id, 42);
        assert_eq!(show.user_rating, 0.0);
        assert!(show.genres.is_empty());
        assert!(show.release_date.is_none());
    }
}
