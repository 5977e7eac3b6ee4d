//! Controllers that drive the list view-models against a server.
//!
//! A controller owns one view-model behind a mutex. The lock is never held
//! across a request, so several loads may be in flight; the view-model's
//! sequence guard decides which response lands.

use std::sync::{Mutex, MutexGuard, PoisonError};

use fleet_engine::{
    CrewListView, CrewMember, Editable, ListRequest, ListView, Mutation, Page, Ship, ShipId,
    ShipListView, ShipQuery,
};

use crate::client::FleetClient;
use crate::error::Result;

/// A list view-model bound to a client.
#[derive(Debug)]
pub struct ListController<Q, R: Editable> {
    client: FleetClient,
    view: Mutex<ListView<Q, R>>,
}

/// Controller for the ship list screen.
pub type ShipListController = ListController<ShipQuery, Ship>;

/// Controller for the crew list of one ship.
pub type CrewListController = ListController<ShipId, CrewMember>;

impl<Q: Clone + PartialEq, R: Editable> ListController<Q, R> {
    fn with_view(client: FleetClient, view: ListView<Q, R>) -> Self {
        Self {
            client,
            view: Mutex::new(view),
        }
    }

    // View-model methods leave no partial state behind, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ListView<Q, R>> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn client(&self) -> &FleetClient {
        &self.client
    }

    /// Read the current view state.
    pub fn read<T>(&self, f: impl FnOnce(&ListView<Q, R>) -> T) -> T {
        f(&self.lock())
    }

    /// Change the view state without loading anything.
    ///
    /// A request returned by `f` can be passed to `load` later.
    pub fn edit<T>(&self, f: impl FnOnce(&mut ListView<Q, R>) -> T) -> T {
        f(&mut self.lock())
    }

    fn finish_load(&self, seq: u64, result: Result<Page<R>>) -> Result<bool> {
        let mut view = self.lock();
        match result {
            Ok(page) => Ok(view.apply_page(seq, page)),
            Err(e) => {
                if view.apply_error(seq, e.message()) {
                    Err(e)
                } else {
                    tracing::debug!(seq, "Dropped stale failure");
                    Ok(false)
                }
            }
        }
    }

    /// Send a mutation, then report the outcome to the view.
    ///
    /// On success returns the reload request.
    async fn perform(&self, mutation: Mutation) -> Result<ListRequest<Q>> {
        match self.client.apply(&mutation).await {
            Ok(()) => Ok(self.lock().mutation_succeeded()),
            Err(e) => {
                self.lock().mutation_failed(e.message());
                Err(e)
            }
        }
    }
}

impl ListController<ShipQuery, Ship> {
    pub fn new(client: FleetClient, page_size: u64) -> Self {
        Self::with_view(client, ShipListView::for_ships(page_size))
    }

    /// Load the page for `request`.
    ///
    /// Returns false when a newer request was issued meanwhile and this
    /// response was dropped.
    pub async fn load(&self, request: ListRequest<ShipQuery>) -> Result<bool> {
        let result = self.client.list_ships(&request.query).await;
        self.finish_load(request.seq, result)
    }

    pub async fn refresh(&self) -> Result<bool> {
        let request = self.lock().refresh();
        self.load(request).await
    }

    /// Apply a state change and load when the query changed.
    pub async fn update(
        &self,
        change: impl FnOnce(&mut ShipListView) -> Option<ListRequest<ShipQuery>>,
    ) -> Result<bool> {
        let request = change(&mut self.lock());
        match request {
            Some(request) => self.load(request).await,
            None => Ok(false),
        }
    }

    /// Submit the open editor form. Returns false when no form is open.
    ///
    /// A draft that fails validation leaves the form open.
    pub async fn submit(&self) -> Result<bool> {
        let mutation = self.lock().submit()?;
        match mutation {
            Some(mutation) => {
                let request = self.perform(mutation).await?;
                self.load(request).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete(&self, ship: &Ship) -> Result<()> {
        let mutation = self.lock().delete(ship);
        let request = self.perform(mutation).await?;
        self.load(request).await.map(drop)
    }
}

impl ListController<ShipId, CrewMember> {
    pub fn new(client: FleetClient, ship_id: ShipId) -> Self {
        Self::with_view(client, CrewListView::for_ship(ship_id))
    }

    pub async fn load(&self, request: ListRequest<ShipId>) -> Result<bool> {
        let result = self.client.list_crew(request.query).await.map(|rows| {
            let count = rows.len() as u64;
            Page::new(rows, count)
        });
        self.finish_load(request.seq, result)
    }

    pub async fn refresh(&self) -> Result<bool> {
        let request = self.lock().refresh();
        self.load(request).await
    }

    /// Switch to another ship's crew. Loads only when the ship changed.
    pub async fn set_ship(&self, ship_id: ShipId) -> Result<bool> {
        let request = self.lock().set_ship(ship_id);
        match request {
            Some(request) => self.load(request).await,
            None => Ok(false),
        }
    }

    /// Submit the open editor form. Returns false when no form is open.
    pub async fn submit(&self) -> Result<bool> {
        let mutation = self.lock().submit()?;
        match mutation {
            Some(mutation) => {
                let request = self.perform(mutation).await?;
                self.load(request).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete(&self, member: &CrewMember) -> Result<()> {
        let mutation = self.lock().delete(member);
        let request = self.perform(mutation).await?;
        self.load(request).await.map(drop)
    }
}
