// handlers/student/mod.rs - Student endpoints (role 2)

pub mod demandes;
pub mod pfes;

pub use demandes::{add_demande_post, my_demandes_list};
pub use pfes::{pfe_get, pfe_list};
