//! CreateCharacteristicProfileHandler - NOT_STARTED profile at account creation.

use std::sync::Arc;

use crate::domain::characteristic::CharacteristicProfile;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::CharacteristicProfileRepository;

#[derive(Debug, Clone)]
pub struct CreateCharacteristicProfileCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct CreateCharacteristicProfileResult {
    pub profile: CharacteristicProfile,
    /// False when the user already had a profile.
    pub created: bool,
}

/// Idempotent: an existing profile is returned unchanged.
pub struct CreateCharacteristicProfileHandler {
    profiles: Arc<dyn CharacteristicProfileRepository>,
}

impl CreateCharacteristicProfileHandler {
    pub fn new(profiles: Arc<dyn CharacteristicProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(
        &self,
        cmd: CreateCharacteristicProfileCommand,
    ) -> Result<CreateCharacteristicProfileResult, DomainError> {
        if let Some(profile) = self.profiles.find_by_user(&cmd.user_id).await? {
            return Ok(CreateCharacteristicProfileResult {
                profile,
                created: false,
            });
        }

        let profile = CharacteristicProfile::new(cmd.user_id.clone(), Timestamp::now());
        match self.profiles.create(&profile).await {
            Ok(()) => {
                tracing::info!(user_id = %cmd.user_id, "characteristic profile created");
                Ok(CreateCharacteristicProfileResult {
                    profile,
                    created: true,
                })
            }
            // Lost a race with another creator; theirs wins.
            Err(error) if error.code == ErrorCode::ConcurrencyConflict => {
                let profile = self
                    .profiles
                    .find_by_user(&cmd.user_id)
                    .await?
                    .ok_or(error)?;
                Ok(CreateCharacteristicProfileResult {
                    profile,
                    created: false,
                })
            }
            Err(error) => Err(error),
        }
    }
}
