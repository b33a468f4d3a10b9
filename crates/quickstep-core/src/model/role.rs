use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Actor role as delivered by the auth collaborator.
///
/// Wire strings are SCREAMING_SNAKE (`ROOT_ADMIN`, `ADMIN`, ...); everything
/// in this crate branches on the enum, never on the raw string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    RootAdmin,
    Admin,
    Judge,
    Spectator,
    #[default]
    User,
}

impl Role {
    /// Admins bypass the per-judge submission flag (but not each other's cells).
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::RootAdmin | Self::Admin)
    }

    pub fn can_score(&self) -> bool {
        matches!(self, Self::Judge)
    }
}

/// The authenticated actor consuming this core's views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Lowercased login email.
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(email: impl AsRef<str>, role: Role) -> Self {
        Self {
            email: email.as_ref().trim().to_lowercase(),
            role,
        }
    }
}
