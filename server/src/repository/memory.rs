//! In-memory repository over the engine store.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use fleet_engine::{
    CrewMember, CrewMemberFields, CrewMemberId, Error, NewShip, Ship, ShipFilter, ShipId,
    ShipQuery, Store,
};

use super::{CrewRepository, ShipRepository};
use crate::error::{AppError, Result};

/// Both repositories backed by one shared [`Store`].
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ShipRepository for MemoryRepository {
    async fn create(&self, new: &NewShip) -> Result<Ship> {
        Ok(self.lock()?.create_ship(new)?)
    }

    async fn get(&self, ship_id: ShipId) -> Result<Option<Ship>> {
        Ok(self.lock()?.ship(ship_id).cloned())
    }

    async fn exists(&self, ship_id: ShipId) -> Result<bool> {
        Ok(self.lock()?.contains_ship(ship_id))
    }

    async fn list(&self, query: &ShipQuery) -> Result<Vec<Ship>> {
        Ok(self
            .lock()?
            .list_ships(query)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ShipFilter) -> Result<u64> {
        Ok(self.lock()?.count_ships(filter))
    }

    async fn update(&self, ship: &Ship) -> Result<Option<Ship>> {
        match self.lock()?.update_ship(ship.clone()) {
            Ok(updated) => Ok(Some(updated.clone())),
            Err(Error::ShipNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, ship_id: ShipId) -> Result<bool> {
        match self.lock()?.delete_ship(ship_id) {
            Ok(_) => Ok(true),
            Err(Error::ShipNotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[async_trait]
impl CrewRepository for MemoryRepository {
    async fn create(&self, ship_id: ShipId, fields: &CrewMemberFields) -> Result<CrewMember> {
        Ok(self.lock()?.create_crew_member(ship_id, fields)?)
    }

    async fn list_for_ship(&self, ship_id: ShipId) -> Result<Vec<CrewMember>> {
        Ok(self.lock()?.crew_of(ship_id).into_iter().cloned().collect())
    }

    async fn get(
        &self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    ) -> Result<Option<CrewMember>> {
        Ok(self.lock()?.crew_member(ship_id, crew_member_id).cloned())
    }

    async fn update(&self, member: &CrewMember) -> Result<Option<CrewMember>> {
        match self.lock()?.update_crew_member(member.clone()) {
            Ok(updated) => Ok(Some(updated.clone())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, ship_id: ShipId, crew_member_id: CrewMemberId) -> Result<bool> {
        match self.lock()?.delete_crew_member(ship_id, crew_member_id) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
