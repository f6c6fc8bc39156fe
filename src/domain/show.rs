use serde::{Deserialize, Serialize};

/// Unique identifier for a show (the TMDB movie id)
pub type ShowId = i64;

/// A movie tracked in the local library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Primary key.
    pub show_id: ShowId,
    pub title: String,
    /// Synopsis shown on the detail view.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster path relative to the TMDB image host, e.g. `/abc.jpg`.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date as `YYYY-MM-DD`.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// User rating on a 0.0 - 10.0 scale.
    #[serde(default)]
    pub user_rating: f32,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Show {
    /// A show with only the required fields set and an unrated score.
    pub fn new(show_id: ShowId, title: impl Into<String>) -> Self {
        Self {
            show_id,
            title: title.into(),
            overview: None,
            poster_path: None,
            release_date: None,
            runtime: None,
            user_rating: 0.0,
            genres: Vec::new(),
        }
    }
}
