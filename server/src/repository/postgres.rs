//! PostgreSQL repository over the `db` queries.

use async_trait::async_trait;
use fleet_engine::{
    CrewMember, CrewMemberFields, CrewMemberId, NewShip, Ship, ShipFilter, ShipId, ShipQuery,
};

use super::{CrewRepository, ShipRepository};
use crate::db::{self, Pool};
use crate::error::{AppError, Result};

/// Both repositories backed by a connection pool.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: Pool,
}

impl PgRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShipRepository for PgRepository {
    async fn create(&self, new: &NewShip) -> Result<Ship> {
        Ok(db::insert_ship(&self.pool, new).await?)
    }

    async fn get(&self, ship_id: ShipId) -> Result<Option<Ship>> {
        Ok(db::get_ship(&self.pool, ship_id).await?)
    }

    async fn exists(&self, ship_id: ShipId) -> Result<bool> {
        Ok(db::ship_exists(&self.pool, ship_id).await?)
    }

    async fn list(&self, query: &ShipQuery) -> Result<Vec<Ship>> {
        Ok(db::list_ships(&self.pool, query).await?)
    }

    async fn count(&self, filter: &ShipFilter) -> Result<u64> {
        Ok(db::count_ships(&self.pool, filter).await?)
    }

    async fn update(&self, ship: &Ship) -> Result<Option<Ship>> {
        Ok(db::update_ship(&self.pool, ship).await?)
    }

    async fn delete(&self, ship_id: ShipId) -> Result<bool> {
        Ok(db::delete_ship(&self.pool, ship_id).await?)
    }

    async fn clear(&self) -> Result<()> {
        Ok(db::clear_fleet(&self.pool).await?)
    }
}

#[async_trait]
impl CrewRepository for PgRepository {
    async fn create(&self, ship_id: ShipId, fields: &CrewMemberFields) -> Result<CrewMember> {
        match db::insert_crew_member(&self.pool, ship_id, fields).await {
            Ok(member) => Ok(member),
            // The ship was deleted after the handler's existence probe.
            Err(e) if db::is_foreign_key_violation(&e) => {
                Err(AppError::Engine(fleet_engine::Error::ShipNotFound(ship_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_for_ship(&self, ship_id: ShipId) -> Result<Vec<CrewMember>> {
        Ok(db::list_crew_members(&self.pool, ship_id).await?)
    }

    async fn get(
        &self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    ) -> Result<Option<CrewMember>> {
        Ok(db::get_crew_member(&self.pool, ship_id, crew_member_id).await?)
    }

    async fn update(&self, member: &CrewMember) -> Result<Option<CrewMember>> {
        Ok(db::update_crew_member(&self.pool, member).await?)
    }

    async fn delete(&self, ship_id: ShipId, crew_member_id: CrewMemberId) -> Result<bool> {
        Ok(db::delete_crew_member(&self.pool, ship_id, crew_member_id).await?)
    }
}
