// handlers/public/mod.rs - Endpoints reachable without a session
//
// Service description, health check, the session lifecycle (login, verify,
// logout), student self-registration and the filière list it needs.

pub mod filiere;
pub mod login;
pub mod register;
pub mod root;
pub mod session;

pub use filiere::filiere_list;
pub use login::login_post;
pub use register::register_student_post;
pub use root::{health_get, root_get};
pub use session::{logout_post, verify_get};
