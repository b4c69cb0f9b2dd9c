//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities are the snapshots the payment scheduler and notification
//! aggregator read from. Each entity has a Model struct for data and an Entity
//! struct for operations.

pub mod negotiation_project;
pub mod payment;
pub mod profile;
pub mod system_state;
pub mod video;

// Re-export specific types to avoid conflicts
pub use negotiation_project::{
    Column as ProjectColumn, Entity as NegotiationProject, Model as ProjectModel, ProjectStatus,
};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
pub use video::{Column as VideoColumn, Entity as Video, Model as VideoModel};
