//! Authenticated caller identity.
//!
//! Authentication happens outside this core. Operations that need
//! authorization (e.g. order cancellation) receive an already-authenticated
//! [`Session`] and perform only ownership comparison.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Role attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

/// An authenticated caller identity, passed explicitly into every
/// authorization-sensitive operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl Session {
    #[must_use]
    pub fn user(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::User,
        }
    }

    #[must_use]
    pub fn admin(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::Admin,
        }
    }

    /// Whether this session may act on a resource owned by `owner`.
    #[must_use]
    pub fn can_act_for(&self, owner: UserId) -> bool {
        self.role == Role::Admin || self.id == owner
    }
}
