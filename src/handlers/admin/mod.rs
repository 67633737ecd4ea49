// handlers/admin/mod.rs - Administrator endpoints (role 3)

pub mod filieres;
pub mod users;

pub use filieres::{filiere_delete, filiere_post, filiere_put};
pub use users::{user_delete, user_put, users_list, users_post};
