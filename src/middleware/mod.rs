pub mod auth;
pub mod rbac;
pub mod response;

pub use auth::AuthUser;
pub use rbac::{RequireAdmin, RequireDeptHead, RequireProfessor, RequireStudent};
pub use response::{ApiResponse, ApiResult};
