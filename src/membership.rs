//! Membership
//!
//! Member records keyed by member id, kept in insertion order.

use std::collections::HashMap;

use crate::aggregate::Member;
use crate::domain::{DomainError, MemberId};

/// In-memory member registry
#[derive(Debug, Default)]
pub struct Membership {
    members: Vec<Member>,
    index: HashMap<MemberId, usize>,
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        id: MemberId,
    ) -> Result<Member, DomainError> {
        if self.index.contains_key(&id) {
            return Err(DomainError::duplicate_member(id));
        }

        let member = Member::new(id, name.into())?;
        self.index.insert(id, self.members.len());
        self.members.push(member.clone());

        tracing::info!("Member added: {} ({})", member.name(), member.id());
        Ok(member)
    }

    pub fn find_member(&self, id: MemberId) -> Result<&Member, DomainError> {
        self.index
            .get(&id)
            .and_then(|&i| self.members.get(i))
            .ok_or_else(|| DomainError::member_not_found(id))
    }

    /// All members, insertion order
    pub fn list_members(&self) -> Vec<Member> {
        self.members.clone()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
