use super::context::SessionState;
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render nothing yet
    Pending,
    Redirect(&'static str),
    Render,
}

/// Gate in front of a role's screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGuard {
    pub role: Role,
}

impl RoleGuard {
    pub const ADMIN: RoleGuard = RoleGuard { role: Role::Admin };
    pub const DEPT_HEAD: RoleGuard = RoleGuard { role: Role::DeptHead };
    pub const PROFESSOR: RoleGuard = RoleGuard { role: Role::Professor };
    pub const STUDENT: RoleGuard = RoleGuard { role: Role::Student };

    pub fn check(&self, state: &SessionState) -> GuardDecision {
        match state {
            SessionState::Loading => GuardDecision::Pending,
            SessionState::Authenticated(user) if user.role == self.role => GuardDecision::Render,
            SessionState::Authenticated(_) | SessionState::Anonymous => GuardDecision::Redirect(LOGIN_PATH),
        }
    }
}
