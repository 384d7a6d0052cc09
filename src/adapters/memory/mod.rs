//! In-memory storage and directory adapters.
//!
//! Back every port the engine reads or writes; used by the binary and the
//! integration tests.

mod group_directory;
mod group_profile_store;
mod profile_store;

pub use group_directory::InMemoryGroupDirectory;
pub use group_profile_store::InMemoryGroupProfileStore;
pub use profile_store::InMemoryCharacteristicProfileStore;
