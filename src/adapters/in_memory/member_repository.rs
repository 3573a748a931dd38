use crate::domain::{Member, MemberId};
use crate::ports::member_repository::{MemberRepository as MemberRepositoryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::InMemoryError;

/// In-memory implementation of MemberRepository
///
/// Keeps members in registration order. Saving an existing id replaces it in place.
#[derive(Debug, Default)]
pub struct MemberRepository {
    members: Mutex<Vec<Member>>,
}

impl MemberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn add(&self, member: Member) -> Result<Member> {
        let mut members = self.members.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        match members.iter_mut().find(|existing| existing.id() == member.id()) {
            Some(existing) => *existing = member.clone(),
            None => members.push(member.clone()),
        }
        Ok(member)
    }

    async fn delete(&self, id: MemberId) -> Result<()> {
        let mut members = self.members.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        members.retain(|member| member.id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        let members = self.members.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        Ok(members.iter().find(|member| member.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let members = self.members.lock().map_err(|_| InMemoryError::LockPoisoned)?;
        Ok(members.clone())
    }
}
