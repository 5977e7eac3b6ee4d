//! Repository ports, one per entity kind.
//!
//! Handlers only see these traits. The server wires either the PostgreSQL
//! adapter or the in-memory one into [`AppState`](crate::AppState).

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;
use fleet_engine::{
    CrewMember, CrewMemberFields, CrewMemberId, NewShip, Ship, ShipFilter, ShipId, ShipQuery,
};

use crate::error::Result;

/// Persistence for ships.
#[async_trait]
pub trait ShipRepository: Send + Sync {
    /// Insert a validated ship, assigning its key.
    async fn create(&self, new: &NewShip) -> Result<Ship>;

    async fn get(&self, ship_id: ShipId) -> Result<Option<Ship>>;

    async fn exists(&self, ship_id: ShipId) -> Result<bool>;

    /// Ships matching the query: filter, then sort, then page window.
    async fn list(&self, query: &ShipQuery) -> Result<Vec<Ship>>;

    /// Ships matching the filter, regardless of any page window.
    async fn count(&self, filter: &ShipFilter) -> Result<u64>;

    /// Replace a ship by key. `None` when the ship does not exist.
    async fn update(&self, ship: &Ship) -> Result<Option<Ship>>;

    /// Remove a ship and its crew. `false` when the ship does not exist.
    async fn delete(&self, ship_id: ShipId) -> Result<bool>;

    /// Remove every ship and crew member without reusing keys.
    async fn clear(&self) -> Result<()>;
}

/// Persistence for crew members, always scoped by their ship.
#[async_trait]
pub trait CrewRepository: Send + Sync {
    /// Insert a validated crew member under a ship.
    ///
    /// Fails with [`fleet_engine::Error::ShipNotFound`] if the ship is gone.
    async fn create(&self, ship_id: ShipId, fields: &CrewMemberFields) -> Result<CrewMember>;

    async fn list_for_ship(&self, ship_id: ShipId) -> Result<Vec<CrewMember>>;

    async fn get(&self, ship_id: ShipId, crew_member_id: CrewMemberId)
        -> Result<Option<CrewMember>>;

    /// Replace a crew member matched by both keys.
    async fn update(&self, member: &CrewMember) -> Result<Option<CrewMember>>;

    async fn delete(&self, ship_id: ShipId, crew_member_id: CrewMemberId) -> Result<bool>;
}
