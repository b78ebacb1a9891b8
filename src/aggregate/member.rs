//! Member entity

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, MemberId};

/// Registered library member. Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
}

impl Member {
    pub fn new(id: MemberId, name: String) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::invalid_input("Member name must not be blank"));
        }
        Ok(Self { id, name })
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
