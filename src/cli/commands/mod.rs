pub mod auth;
pub mod demande;
pub mod list;
pub mod server;
pub mod student;
