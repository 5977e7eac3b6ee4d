//! # Fleet Engine
//!
//! The pure core of the fleet admin tool: ships, the crew members nested under
//! them, and the query logic that lists them.
//!
//! This crate holds no IO. The server crate persists records and exposes them
//! over HTTP; the client crate talks to that server. Both share the types and
//! rules defined here, so a query built on one side parses identically on the
//! other.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! - [`Ship`] - a top-level record with a name and a displacement
//! - [`CrewMember`] - owned by exactly one ship, with a name and a [`Role`]
//!
//! Surrogate keys ([`ShipId`], [`CrewMemberId`]) are assigned by the store and
//! never reused.
//!
//! ### Queries
//!
//! A [`ShipQuery`] combines a [`ShipFilter`], an optional [`Sort`] and an
//! optional [`PageWindow`]. It is applied filter first, then sort, then page.
//! [`ShipQuery::from_params`] parses request parameters and
//! [`ShipQuery::to_params`] produces them.
//!
//! ### Store
//!
//! [`Store`] is an in-memory entity store enforcing the field constraints and
//! the ship → crew relationship. Deleting a ship removes its crew.
//!
//! ### View-Models
//!
//! [`ListView`] tracks the list state of one screen, stamps every list request
//! with a sequence number and discards responses to superseded requests.
//!
//! ## Quick Start
//!
//! ```rust
//! use fleet_engine::{NewShip, QueryLimits, ShipQuery, Store};
//!
//! let mut store = Store::new();
//! store.create_ship(&NewShip::new("Argo", 120)).unwrap();
//! store.create_ship(&NewShip::new("Endurance", 350)).unwrap();
//!
//! let params = [("sortField", "displacement"), ("sortOrder", "-1")];
//! let query = ShipQuery::from_params(params, &QueryLimits::default()).unwrap();
//!
//! let ships = store.list_ships(&query);
//! assert_eq!(ships[0].name, "Endurance");
//! assert_eq!(store.count_ships(&query.filter), 2);
//! ```

pub mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod view;

// Re-export main types at crate root
pub use error::{Error, Result};
pub use model::{
    CrewMember, CrewMemberFields, CrewMemberPatch, NewCrewMember, NewShip, Role, Ship, ShipPatch,
    CREW_NAME_MIN_LEN, MIN_DISPLACEMENT, SHIP_NAME_MIN_LEN,
};
pub use query::{
    Page, PageWindow, QueryLimits, ShipFilter, ShipQuery, Sort, SortField, SortOrder,
    DEFAULT_PAGE_SIZE,
};
pub use store::Store;
pub use view::{
    CrewListView, CrewMemberDraft, Editable, EditorForm, EditorMode, ListRequest, ListView,
    Mutation, ShipDraft, ShipListView,
};

/// Type aliases for clarity
pub type ShipId = i64;
pub type CrewMemberId = i64;
