//! Table-level change notification.
//!
//! Every committed write that changed at least one row bumps the version of
//! the tables it touched. Live queries watch the versions of the tables
//! they read and re-run when one of them moves.

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Shows,
    UserLists,
    ListShows,
}

impl Table {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Self::Shows => 0,
            Self::UserLists => 1,
            Self::ListShows => 2,
        }
    }
}

/// Per-table write counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableVersions([u64; Table::COUNT]);

impl TableVersions {
    pub fn get(&self, table: Table) -> u64 {
        self.0[table.index()]
    }

    /// True if any of `tables` moved between `self` and `newer`.
    pub fn changed_since(&self, newer: &TableVersions, tables: &[Table]) -> bool {
        tables.iter().any(|t| self.get(*t) != newer.get(*t))
    }
}

struct Inner {
    versions: watch::Sender<TableVersions>,
    shutdown: CancellationToken,
}

#[derive(Clone)]
pub struct InvalidationTracker {
    inner: Arc<Inner>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        let (versions, _) = watch::channel(TableVersions::default());
        Self {
            inner: Arc::new(Inner {
                versions,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn notify(&self, tables: &[Table]) {
        if tables.is_empty() {
            return;
        }
        self.inner.versions.send_modify(|versions| {
            for table in tables {
                versions.0[table.index()] += 1;
            }
        });
        log::trace!("invalidated {:?}", tables);
    }

    pub fn subscribe(&self) -> watch::Receiver<TableVersions> {
        self.inner.versions.subscribe()
    }

    pub fn versions(&self) -> TableVersions {
        *self.inner.versions.borrow()
    }

    /// Number of live queries currently attached.
    pub fn observer_count(&self) -> usize {
        self.inner.versions.receiver_count()
    }

    /// Token cancelled by [`InvalidationTracker::shutdown`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    /// End every live query and refuse further writes.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_bumps_only_named_tables() {
        let tracker = InvalidationTracker::new();
        let before = tracker.versions();

        tracker.notify(&[Table::Shows, Table::ListShows]);
        let after = tracker.versions();

        assert_eq!(after.get(Table::Shows), 1);
        assert_eq!(after.get(Table::UserLists), 0);
        assert_eq!(after.get(Table::ListShows), 1);
        assert!(before.changed_since(&after, &[Table::Shows]));
        assert!(!before.changed_since(&after, &[Table::UserLists]));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let tracker = InvalidationTracker::new();
        let mut rx = tracker.subscribe();
        assert_eq!(tracker.observer_count(), 1);
        assert!(!rx.has_changed().unwrap());

        tracker.notify(&[Table::UserLists]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().get(Table::UserLists), 1);

        tracker.notify(&[]);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_shutdown_cancels_token() {
        let tracker = InvalidationTracker::new();
        let token = tracker.shutdown_token().child_token();
        assert!(!tracker.is_shut_down());

        tracker.shutdown();
        assert!(tracker.is_shut_down());
        assert!(token.is_cancelled());
    }
}
