//! Characteristic profile module.
//!
//! Per-user role scores produced by the onboarding quiz, plus the
//! reliability weight that discounts incomplete answers.

mod events;
mod profile;
mod quiz_status;
mod role;
mod role_vector;

pub use events::CharacteristicProfileUpdated;
pub use profile::{CharacteristicProfile, ProfileVersion};
pub use quiz_status::{reliability, QuizProgress, QuizStatus};
pub use role::Role;
pub use role_vector::RoleVector;
