//! Table-level data access over the shared `PgPool`.
//!
//! Each repository is cheap to build per request (`PgPool` is an `Arc`).
//! Writes that touch more than one table run in a single transaction.

pub mod catalog;
pub mod demandes;
pub mod pfes;
pub mod stats;
pub mod users;

pub use catalog::{CatalogRepository, FiliereRepository};
pub use demandes::DemandeRepository;
pub use pfes::{PfeInput, PfeRepository};
pub use stats::{DashboardStats, StatsRepository};
pub use users::{NewUser, UserRepository, UserUpdate};
