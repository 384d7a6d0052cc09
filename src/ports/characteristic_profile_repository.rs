//! CharacteristicProfileRepository port - per-user profile persistence.

use async_trait::async_trait;

use crate::domain::characteristic::{CharacteristicProfile, ProfileVersion};
use crate::domain::foundation::{DomainError, UserId};

/// Store for `CharacteristicProfile`, one record per user.
///
/// Writes after creation go through `compare_and_swap` so that concurrent
/// read-modify-write cycles cannot silently overwrite each other.
#[async_trait]
pub trait CharacteristicProfileRepository: Send + Sync {
    /// Find a profile by owning user.
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CharacteristicProfile>, DomainError>;

    /// Load several profiles at once. Users without a profile are omitted.
    async fn find_many(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<CharacteristicProfile>, DomainError>;

    /// Insert a new profile.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if a profile already exists for the user
    async fn create(&self, profile: &CharacteristicProfile) -> Result<(), DomainError>;

    /// Replace the stored profile only if its version still equals
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` on version mismatch
    /// - `ProfileNotFound` if no profile exists for the user
    async fn compare_and_swap(
        &self,
        profile: &CharacteristicProfile,
        expected_version: ProfileVersion,
    ) -> Result<(), DomainError>;
}
