//! # Fleet Client
//!
//! HTTP client for the fleet API, plus controllers that keep the engine's
//! list view-models in step with a server.
//!
//! ```no_run
//! use fleet_client::{FleetClient, ShipListController};
//! use fleet_engine::{Sort, SortField};
//!
//! # async fn run() -> fleet_client::Result<()> {
//! let client = FleetClient::new("http://localhost:3030")?;
//! let ships = ShipListController::new(client, 2);
//!
//! ships.refresh().await?;
//! ships
//!     .update(|view| view.set_sort(Some(Sort::descending(SortField::Displacement))))
//!     .await?;
//! let heaviest = ships.read(|view| view.rows().first().cloned());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod controller;
pub mod error;

pub use client::{FleetClient, HealthStatus};
pub use controller::{CrewListController, ListController, ShipListController};
pub use error::{ClientError, Result};
