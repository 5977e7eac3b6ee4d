//! Crew member handlers. Every operation resolves the owning ship first.

use fleet_engine::{CrewMember, CrewMemberId, CrewMemberPatch, Error, NewCrewMember, ShipId};

use crate::error::Result;
use crate::repository::{CrewRepository, ShipRepository};

async fn require_ship(ships: &dyn ShipRepository, ship_id: ShipId) -> Result<()> {
    if ships.exists(ship_id).await? {
        Ok(())
    } else {
        Err(Error::ShipNotFound(ship_id).into())
    }
}

fn crew_member_not_found(ship_id: ShipId, crew_member_id: CrewMemberId) -> Error {
    Error::CrewMemberNotFound {
        ship_id,
        crew_member_id,
    }
}

/// The whole crew of a ship, ordered by key.
pub async fn handle_list_crew(
    ships: &dyn ShipRepository,
    crew: &dyn CrewRepository,
    ship_id: ShipId,
) -> Result<Vec<CrewMember>> {
    require_ship(ships, ship_id).await?;
    crew.list_for_ship(ship_id).await
}

pub async fn handle_get_crew_member(
    ships: &dyn ShipRepository,
    crew: &dyn CrewRepository,
    ship_id: ShipId,
    crew_member_id: CrewMemberId,
) -> Result<CrewMember> {
    require_ship(ships, ship_id).await?;
    crew.get(ship_id, crew_member_id)
        .await?
        .ok_or_else(|| crew_member_not_found(ship_id, crew_member_id).into())
}

/// Validate and insert a crew member under an existing ship.
pub async fn handle_create_crew_member(
    ships: &dyn ShipRepository,
    crew: &dyn CrewRepository,
    ship_id: ShipId,
    new: NewCrewMember,
) -> Result<CrewMember> {
    require_ship(ships, ship_id).await?;
    let fields = new.validate()?;

    let member = crew.create(ship_id, &fields).await?;
    tracing::info!(
        ship_id,
        crew_member_id = member.crew_member_id,
        "Created crew member"
    );

    Ok(member)
}

/// Replace the fields present in `patch`, keeping the rest.
pub async fn handle_update_crew_member(
    ships: &dyn ShipRepository,
    crew: &dyn CrewRepository,
    ship_id: ShipId,
    crew_member_id: CrewMemberId,
    patch: CrewMemberPatch,
) -> Result<CrewMember> {
    let current = handle_get_crew_member(ships, crew, ship_id, crew_member_id).await?;

    let replacement = current.patched(&patch)?;
    replacement.validate()?;

    let member = crew
        .update(&replacement)
        .await?
        .ok_or_else(|| crew_member_not_found(ship_id, crew_member_id))?;
    tracing::info!(ship_id, crew_member_id, "Updated crew member");

    Ok(member)
}

pub async fn handle_delete_crew_member(
    ships: &dyn ShipRepository,
    crew: &dyn CrewRepository,
    ship_id: ShipId,
    crew_member_id: CrewMemberId,
) -> Result<()> {
    require_ship(ships, ship_id).await?;
    if !crew.delete(ship_id, crew_member_id).await? {
        return Err(crew_member_not_found(ship_id, crew_member_id).into());
    }

    tracing::info!(ship_id, crew_member_id, "Deleted crew member");
    Ok(())
}
