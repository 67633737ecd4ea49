// handlers/prof/mod.rs - Professor endpoints (role 0)

pub mod demandes;
pub mod pfes;

pub use demandes::{affect_pfe_put, demande_delete, prof_demandes_list};
pub use pfes::{my_pfe_list, new_pfe_post, pfe_delete, update_pfe_put};
