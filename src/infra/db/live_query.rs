//! Push-based read streams over SQLite queries.
//!
//! A live query runs its query on the blocking pool, emits the result, then
//! waits for the invalidation tracker to report a write to one of its
//! tables and runs again. Results equal to the previous emission are not
//! re-emitted. Dropping the stream cancels the background task.

use super::invalidation::{InvalidationTracker, Table, TableVersions};
use crate::domain::StoreError;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::{CancellationToken, DropGuard};

/// A live stream of query results.
///
/// Each item is a complete snapshot. The stream ends only when it is
/// closed, when the database shuts down, or after yielding a storage error.
pub struct LiveStream<T> {
    rx: mpsc::Receiver<Result<T, StoreError>>,
    cancel: Option<DropGuard>,
}

impl<T> LiveStream<T> {
    /// Stop observing. Buffered snapshots are discarded and no further
    /// items are delivered.
    pub fn close(&mut self) {
        if let Some(guard) = self.cancel.take() {
            guard.disarm().cancel();
        }
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    /// Wait for the first snapshot, then stop observing.
    pub async fn first(mut self) -> Result<T, StoreError> {
        let next = self.rx.recv().await;
        self.close();
        next.unwrap_or(Err(StoreError::Closed))
    }
}

impl<T> Stream for LiveStream<T> {
    type Item = Result<T, StoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Start a live query over `tables`. Must be called from within a tokio
/// runtime.
pub fn observe<T, F>(tracker: &InvalidationTracker, tables: &'static [Table], query: F) -> LiveStream<T>
where
    T: Clone + PartialEq + Send + 'static,
    F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let token = tracker.shutdown_token().child_token();
    let versions = tracker.subscribe();
    tokio::spawn(run(versions, tables, Arc::new(query), tx, token.clone()));

    LiveStream {
        rx,
        cancel: Some(token.drop_guard()),
    }
}

async fn run<T, F>(
    mut versions: watch::Receiver<TableVersions>,
    tables: &'static [Table],
    query: Arc<F>,
    tx: mpsc::Sender<Result<T, StoreError>>,
    token: CancellationToken,
) where
    T: Clone + PartialEq + Send + 'static,
    F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
{
    let mut last: Option<T> = None;

    'observe: loop {
        let mut seen = *versions.borrow_and_update();

        let q = query.clone();
        let outcome = match tokio::task::spawn_blocking(move || (*q)()).await {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(err)) => {
                log::warn!("Live query on {:?} failed: {:#}", tables, err);
                Err(StoreError::Storage(err))
            }
            Err(err) => {
                log::warn!("Live query on {:?} panicked: {}", tables, err);
                Err(StoreError::Task(err))
            }
        };
        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = tx.send(Err(err)) => {}
                }
                break;
            }
        };

        if last.as_ref() != Some(&snapshot) {
            tokio::select! {
                _ = token.cancelled() => break,
                sent = tx.send(Ok(snapshot.clone())) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
            last = Some(snapshot);
        }

        // Wait for a write to one of our tables.
        loop {
            tokio::select! {
                _ = token.cancelled() => break 'observe,
                _ = tx.closed() => break 'observe,
                changed = versions.changed() => {
                    if changed.is_err() {
                        break 'observe;
                    }
                    let now = *versions.borrow_and_update();
                    if seen.changed_since(&now, tables) {
                        continue 'observe;
                    }
                    seen = now;
                }
            }
        }
    }

    log::debug!("Live query on {:?} stopped", tables);
}
