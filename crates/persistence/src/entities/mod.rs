//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod invitation;
pub mod notification;
pub mod player;
pub mod training_session;
pub mod user;

pub use invitation::{InvitationEntity, InvitationStatusDb};
pub use notification::NotificationEntity;
pub use player::PlayerEntity;
pub use training_session::TrainingSessionEntity;
pub use user::{UserActivityEntity, UserEntity, UserRoleDb};
