//! Adapters - Implementations of port interfaces.
//!
//! - `events` - In-process event bus
//! - `memory` - Profile stores, group directory, enrollments
//! - `quiz` - Answer key sources (built-in, YAML file)

pub mod events;
pub mod memory;
pub mod quiz;

pub use events::InMemoryEventBus;
pub use memory::{
    InMemoryCharacteristicProfileStore, InMemoryGroupDirectory, InMemoryGroupProfileStore,
};
pub use quiz::{StaticAnswerKeySource, YamlAnswerKeySource};
