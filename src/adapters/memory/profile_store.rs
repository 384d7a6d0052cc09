//! In-memory characteristic profile store with version compare-and-swap.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::characteristic::{CharacteristicProfile, ProfileVersion};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::CharacteristicProfileRepository;

/// Profiles keyed by user. The version check and the replace happen under
/// one write lock, which makes `compare_and_swap` atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCharacteristicProfileStore {
    profiles: Arc<RwLock<HashMap<UserId, CharacteristicProfile>>>,
}

impl InMemoryCharacteristicProfileStore {
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
impl CharacteristicProfileRepository for InMemoryCharacteristicProfileStore {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CharacteristicProfile>, DomainError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn find_many(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<CharacteristicProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }

    async fn create(&self, profile: &CharacteristicProfile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(profile.user_id()) {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Profile already exists for user {}", profile.user_id()),
            ));
        }
        profiles.insert(profile.user_id().clone(), profile.clone());
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        profile: &CharacteristicProfile,
        expected_version: ProfileVersion,
    ) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles.get_mut(profile.user_id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ProfileNotFound,
                format!("No profile for user {}", profile.user_id()),
            )
        })?;

        if stored.version() != expected_version {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Profile version mismatch for user {}: expected {}, found {}",
                    profile.user_id(),
                    expected_version.as_u64(),
                    stored.version().as_u64()
                ),
            ));
        }

        *stored = profile.clone();
        Ok(())
    }
}
