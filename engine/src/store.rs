//! Store - the in-memory entity store.
//!
//! The Store holds ships and crew members, assigns their keys, and enforces
//! field constraints and the ship → crew relationship on every write.

use crate::{
    error::Result, CrewMember, CrewMemberFields, CrewMemberId, Error, NewShip, Ship, ShipFilter,
    ShipId, ShipQuery,
};
use std::collections::BTreeMap;

/// The main store holding all records.
///
/// Keys start at 1 and are never reused, not even after [`Store::clear`].
#[derive(Debug, Clone)]
pub struct Store {
    /// Ships by key
    ships: BTreeMap<ShipId, Ship>,
    /// Crew members by key
    crew: BTreeMap<CrewMemberId, CrewMember>,
    next_ship_id: ShipId,
    next_crew_member_id: CrewMemberId,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            ships: BTreeMap::new(),
            crew: BTreeMap::new(),
            next_ship_id: 1,
            next_crew_member_id: 1,
        }
    }

    // --- ships ---

    /// Validate and insert a ship, assigning its key.
    pub fn create_ship(&mut self, new: &NewShip) -> Result<Ship> {
        new.validate()?;

        let ship = Ship {
            ship_id: self.next_ship_id,
            name: new.name.clone(),
            displacement: new.displacement,
        };
        self.next_ship_id += 1;
        self.ships.insert(ship.ship_id, ship.clone());

        Ok(ship)
    }

    /// Get a ship by key.
    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    /// Check if a ship exists.
    pub fn contains_ship(&self, id: ShipId) -> bool {
        self.ships.contains_key(&id)
    }

    /// Ships matching the query: filtered, sorted, then windowed.
    pub fn list_ships(&self, query: &ShipQuery) -> Vec<&Ship> {
        query.apply(self.ships.values())
    }

    /// Count of ships matching the filter, ignoring any page window.
    pub fn count_ships(&self, filter: &ShipFilter) -> u64 {
        self.ships.values().filter(|s| filter.matches(s)).count() as u64
    }

    /// Replace a ship by key.
    pub fn update_ship(&mut self, ship: Ship) -> Result<&Ship> {
        ship.validate()?;

        let slot = self
            .ships
            .get_mut(&ship.ship_id)
            .ok_or(Error::ShipNotFound(ship.ship_id))?;
        *slot = ship;

        Ok(slot)
    }

    /// Remove a ship and every crew member on it.
    ///
    /// Returns the keys of the removed crew members.
    pub fn delete_ship(&mut self, id: ShipId) -> Result<Vec<CrewMemberId>> {
        self.ships.remove(&id).ok_or(Error::ShipNotFound(id))?;

        let orphaned: Vec<CrewMemberId> = self
            .crew
            .values()
            .filter(|m| m.ship_id == id)
            .map(|m| m.crew_member_id)
            .collect();
        for crew_member_id in &orphaned {
            self.crew.remove(crew_member_id);
        }

        Ok(orphaned)
    }

    /// Number of ships.
    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    // --- crew ---

    /// Insert a crew member under an existing ship, assigning its key.
    pub fn create_crew_member(
        &mut self,
        ship_id: ShipId,
        fields: &CrewMemberFields,
    ) -> Result<CrewMember> {
        if !self.contains_ship(ship_id) {
            return Err(Error::ShipNotFound(ship_id));
        }

        let member = CrewMember {
            crew_member_id: self.next_crew_member_id,
            name: fields.name.clone(),
            role: fields.role,
            ship_id,
        };
        member.validate()?;

        self.next_crew_member_id += 1;
        self.crew.insert(member.crew_member_id, member.clone());

        Ok(member)
    }

    /// Crew members of a ship, in key order.
    pub fn crew_of(&self, ship_id: ShipId) -> Vec<&CrewMember> {
        self.crew.values().filter(|m| m.ship_id == ship_id).collect()
    }

    /// Get a crew member scoped by both keys.
    pub fn crew_member(
        &self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    ) -> Option<&CrewMember> {
        self.crew
            .get(&crew_member_id)
            .filter(|m| m.ship_id == ship_id)
    }

    /// Replace a crew member, scoped by both keys.
    pub fn update_crew_member(&mut self, member: CrewMember) -> Result<&CrewMember> {
        member.validate()?;

        if !self.contains_ship(member.ship_id) {
            return Err(Error::ShipNotFound(member.ship_id));
        }
        let slot = self
            .crew
            .get_mut(&member.crew_member_id)
            .filter(|m| m.ship_id == member.ship_id)
            .ok_or(Error::CrewMemberNotFound {
                ship_id: member.ship_id,
                crew_member_id: member.crew_member_id,
            })?;
        *slot = member;

        Ok(slot)
    }

    /// Remove a crew member, scoped by both keys.
    pub fn delete_crew_member(
        &mut self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    ) -> Result<()> {
        if !self.contains_ship(ship_id) {
            return Err(Error::ShipNotFound(ship_id));
        }
        if self.crew_member(ship_id, crew_member_id).is_none() {
            return Err(Error::CrewMemberNotFound {
                ship_id,
                crew_member_id,
            });
        }
        self.crew.remove(&crew_member_id);
        Ok(())
    }

    /// Number of crew members across all ships.
    pub fn crew_count(&self) -> usize {
        self.crew.len()
    }

    /// Remove every record. Key counters keep running.
    pub fn clear(&mut self) {
        self.ships.clear();
        self.crew.clear();
    }
}
