//! Database module for PostgreSQL persistence.

mod crew_members;
mod pool;
mod ships;

pub use crew_members::*;
pub use pool::*;
pub use ships::*;
