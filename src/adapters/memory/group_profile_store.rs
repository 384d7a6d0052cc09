//! In-memory group profile store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, GroupId};
use crate::domain::group::GroupCharacteristicProfile;
use crate::ports::GroupProfileRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupProfileStore {
    profiles: Arc<RwLock<HashMap<GroupId, GroupCharacteristicProfile>>>,
}

impl InMemoryGroupProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl GroupProfileRepository for InMemoryGroupProfileStore {
    async fn find(
        &self,
        group_id: GroupId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError> {
        Ok(self.profiles.read().await.get(&group_id).cloned())
    }

    async fn find_many(
        &self,
        group_ids: &[GroupId],
    ) -> Result<Vec<GroupCharacteristicProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(group_ids
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }

    async fn save(&self, profile: &GroupCharacteristicProfile) -> Result<(), DomainError> {
        self.profiles
            .write()
            .await
            .insert(profile.group_id(), profile.clone());
        Ok(())
    }

    async fn insert_if_absent(
        &self,
        profile: &GroupCharacteristicProfile,
    ) -> Result<bool, DomainError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.group_id()) {
            return Ok(false);
        }
        profiles.insert(profile.group_id(), profile.clone());
        Ok(true)
    }

    async fn delete(&self, group_id: GroupId) -> Result<(), DomainError> {
        self.profiles.write().await.remove(&group_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::characteristic::{Role, RoleVector};
    use crate::domain::foundation::Timestamp;

    fn profile(group_id: GroupId, role: Role) -> GroupCharacteristicProfile {
        GroupCharacteristicProfile::new(group_id, RoleVector::one_hot(role), 1, Timestamp::now())
    }

    #[tokio::test]
    async fn save_replaces_existing() {
        let store = InMemoryGroupProfileStore::new();
        let id = GroupId::new();

        store.save(&profile(id, Role::Leader)).await.unwrap();
        store.save(&profile(id, Role::Expert)).await.unwrap();

        let stored = store.find(id).await.unwrap().unwrap();
        assert_eq!(stored.average_scores().get(Role::Expert), 1.0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_write() {
        let store = InMemoryGroupProfileStore::new();
        let id = GroupId::new();

        assert!(store.insert_if_absent(&profile(id, Role::Leader)).await.unwrap());
        assert!(!store.insert_if_absent(&profile(id, Role::Expert)).await.unwrap());

        let stored = store.find(id).await.unwrap().unwrap();
        assert_eq!(stored.average_scores().get(Role::Leader), 1.0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryGroupProfileStore::new();
        let id = GroupId::new();
        store.save(&profile(id, Role::Leader)).await.unwrap();

        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();

        assert!(store.find(id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
