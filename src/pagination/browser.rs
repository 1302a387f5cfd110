//! Async driver for the pagination controller.
//!
//! [`Browser`] executes the [`PageRequest`]s issued by a
//! [`PaginationController`] on the tokio runtime and feeds the results back.
//! Every state transition is published as a [`PaginationSnapshot`] on a
//! watch channel, so presentation code observes state instead of awaiting
//! fetches.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::controller::{
    PageRequest, PaginationController, PaginationSnapshot, Resolution,
};
use crate::fetcher::PageSource;
use crate::filter::FilterState;
use cinescope_common::ResultPage;

/// Runs page fetches for a [`PaginationController`].
pub struct Browser<S> {
    controller: Arc<Mutex<PaginationController>>,
    source: Arc<S>,
    snapshots: Arc<watch::Sender<PaginationSnapshot>>,
}

impl<S> Clone for Browser<S> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            source: self.source.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<S: PageSource> Browser<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_controller(source, PaginationController::new())
    }

    /// Browser seeded with a prefetched first page for the default listing.
    pub fn with_initial_page(source: Arc<S>, page: ResultPage) -> Self {
        Self::with_controller(source, PaginationController::with_initial_page(page))
    }

    fn with_controller(source: Arc<S>, controller: PaginationController) -> Self {
        let (tx, _rx) = watch::channel(controller.snapshot());
        Self {
            controller: Arc::new(Mutex::new(controller)),
            source,
            snapshots: Arc::new(tx),
        }
    }

    /// Receive a snapshot after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<PaginationSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> PaginationSnapshot {
        self.controller.lock().snapshot()
    }

    /// Apply new filters. Returns the spawned fetch, if one was needed.
    pub fn set_query(
        &self,
        keyword: Option<String>,
        release_year: Option<i32>,
    ) -> Option<JoinHandle<Resolution>> {
        let request = {
            let mut controller = self.controller.lock();
            let request = controller.set_query(keyword, release_year);
            self.snapshots.send_replace(controller.snapshot());
            request
        };
        request.map(|r| self.spawn_fetch(r))
    }

    /// Load the next page. Returns `None` when nothing was started.
    pub fn load_next_page(&self) -> Option<JoinHandle<Resolution>> {
        let request = {
            let mut controller = self.controller.lock();
            let request = controller.load_next_page()?;
            self.snapshots.send_replace(controller.snapshot());
            request
        };
        Some(self.spawn_fetch(request))
    }

    /// Keep the browser in step with `filters`.
    ///
    /// Applies the current filters immediately, then every change. The task
    /// ends when the filter state is dropped.
    pub fn follow_filters(&self, filters: &FilterState) -> JoinHandle<()> {
        let browser = self.clone();
        let mut rx = filters.subscribe();

        tokio::spawn(async move {
            loop {
                let current = rx.borrow_and_update().clone();
                tracing::debug!(
                    keyword = ?current.keyword,
                    year = ?current.release_year,
                    "Filters updated"
                );
                browser.set_query(current.keyword, current.release_year);

                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    fn spawn_fetch(&self, request: PageRequest) -> JoinHandle<Resolution> {
        let controller = self.controller.clone();
        let source = self.source.clone();
        let snapshots = self.snapshots.clone();

        tokio::spawn(async move {
            let result = source.fetch_page(request.query()).await;

            let mut controller = controller.lock();
            let resolution = controller.resolve(request, result);
            if resolution == Resolution::Applied {
                snapshots.send_replace(controller.snapshot());
            }
            resolution
        })
    }
}
