//! Request handlers for the fleet resources.
//!
//! Each handler validates its input, probes for the records it depends on,
//! then delegates to the repositories.

mod crew_members;
mod ships;

pub use crew_members::*;
pub use ships::*;
