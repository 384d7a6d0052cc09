//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Storage Ports
//!
//! - `CharacteristicProfileRepository` - Per-user profiles with compare-and-swap writes
//! - `GroupProfileRepository` - Derived group aggregates
//!
//! ## Collaborator Ports
//!
//! - `GroupDirectory` - Group listings and membership (owned by group management)
//! - `EnrollmentReader` - Course enrollments
//! - `AnswerKeySource` - Quiz answer weights

mod answer_key_source;
mod characteristic_profile_repository;
mod enrollment_reader;
mod event_publisher;
mod event_subscriber;
mod group_directory;
mod group_profile_repository;

pub use answer_key_source::AnswerKeySource;
pub use characteristic_profile_repository::CharacteristicProfileRepository;
pub use enrollment_reader::EnrollmentReader;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use group_directory::GroupDirectory;
pub use group_profile_repository::GroupProfileRepository;
