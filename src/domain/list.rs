use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of a user list; list names are unique.
pub type ListName = String;

pub const PLANNING: &str = "Planning";
pub const WATCHING: &str = "Watching";
pub const COMPLETED: &str = "Completed";

/// Lists created on first open. They cannot be deleted.
pub const DEFAULT_LISTS: [&str; 3] = [PLANNING, WATCHING, COMPLETED];

/// A named collection of shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    pub list_name: ListName,
    /// True for Planning, Watching and Completed.
    pub is_default: bool,
    /// Creation timestamp in RFC3339 format.
    pub created_at: String,
}

pub fn is_default_list(name: &str) -> bool {
    DEFAULT_LISTS.contains(&name)
}

/// Watch status of a show, derived from the status lists it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShowStatus {
    #[default]
    Planning,
    Watching,
    Completed,
}

impl ShowStatus {
    /// Name of the default list backing this status.
    pub fn list_name(self) -> &'static str {
        match self {
            Self::Planning => PLANNING,
            Self::Watching => WATCHING,
            Self::Completed => COMPLETED,
        }
    }

    /// Status backed by the default list called exactly `name`.
    pub fn from_list_name(name: &str) -> Option<Self> {
        match name {
            PLANNING => Some(Self::Planning),
            WATCHING => Some(Self::Watching),
            COMPLETED => Some(Self::Completed),
            _ => None,
        }
    }

    /// Completed wins over Watching, which wins over Planning.
    ///
    /// Returns `None` when none of the names is a status list.
    pub fn from_memberships<S: AsRef<str>>(lists: &[S]) -> Option<Self> {
        let has = |name: &str| lists.iter().any(|l| l.as_ref() == name);
        if has(COMPLETED) {
            Some(Self::Completed)
        } else if has(WATCHING) {
            Some(Self::Watching)
        } else if has(PLANNING) {
            Some(Self::Planning)
        } else {
            None
        }
    }
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.list_name())
    }
}

impl FromStr for ShowStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(Self::Planning),
            "watching" => Ok(Self::Watching),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}
