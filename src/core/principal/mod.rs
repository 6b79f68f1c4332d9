mod role;
pub use role::{Role, Section};

use serde::{Deserialize, Serialize};

/// Authenticated user as reported by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    pub fn can_access(&self, section: Section) -> bool {
        self.role.can_access(section)
    }
}
