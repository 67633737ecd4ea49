// handlers/mod.rs - Role-tiered handler tree
//
// Public (no session) → per-role tiers. Role checks happen in the extractors
// of `middleware::rbac`; filière and ownership checks in the handlers.

pub mod admin;
pub mod chef;
pub mod listing;
pub mod prof;
pub mod public;
pub mod student;
