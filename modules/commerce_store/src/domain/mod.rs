//! Domain layer - entity abstraction, repository seam and change events

pub mod entity;
pub mod events;
pub mod repository;
pub mod validation;

pub use entity::Entity;
pub use events::{ChangeEvent, ChangeKind, EventPublisher, NoOpEventPublisher};
pub use repository::Repository;
