//! Ship handlers - list, read and mutate ships.

use fleet_engine::{Error, NewShip, Page, Ship, ShipId, ShipPatch, ShipQuery};

use crate::error::Result;
use crate::repository::ShipRepository;

/// One page of ships plus the size of the filtered set.
pub async fn handle_list_ships(
    ships: &dyn ShipRepository,
    query: &ShipQuery,
) -> Result<Page<Ship>> {
    let records = ships.list(query).await?;
    let count = ships.count(&query.filter).await?;

    tracing::debug!(returned = records.len(), count, "Listed ships");

    Ok(Page::new(records, count))
}

pub async fn handle_get_ship(ships: &dyn ShipRepository, ship_id: ShipId) -> Result<Ship> {
    ships
        .get(ship_id)
        .await?
        .ok_or_else(|| Error::ShipNotFound(ship_id).into())
}

/// Validate and insert a ship. Nothing is written when validation fails.
pub async fn handle_create_ship(ships: &dyn ShipRepository, new: NewShip) -> Result<Ship> {
    new.validate()?;

    let ship = ships.create(&new).await?;
    tracing::info!(ship_id = ship.ship_id, "Created ship");

    Ok(ship)
}

/// Replace the fields present in `patch`, keeping the rest.
pub async fn handle_update_ship(
    ships: &dyn ShipRepository,
    ship_id: ShipId,
    patch: ShipPatch,
) -> Result<Ship> {
    let current = handle_get_ship(ships, ship_id).await?;

    let replacement = current.patched(&patch);
    replacement.validate()?;

    let ship = ships
        .update(&replacement)
        .await?
        .ok_or(Error::ShipNotFound(ship_id))?;
    tracing::info!(ship_id, "Updated ship");

    Ok(ship)
}

/// Remove a ship together with its crew.
pub async fn handle_delete_ship(ships: &dyn ShipRepository, ship_id: ShipId) -> Result<()> {
    if !ships.delete(ship_id).await? {
        return Err(Error::ShipNotFound(ship_id).into());
    }

    tracing::info!(ship_id, "Deleted ship");
    Ok(())
}

/// Wipe every ship and crew member.
pub async fn handle_reset(ships: &dyn ShipRepository) -> Result<()> {
    ships.clear().await?;
    tracing::warn!("Fleet reset");
    Ok(())
}
