//! Repository implementations for database operations.

pub mod invitation;
pub mod notification;
pub mod player;
pub mod training_session;
pub mod user;

pub use invitation::{InvitationRepository, InvitationSignup, RenewalRequestOutcome, SignupOutcome};
pub use notification::NotificationRepository;
pub use player::PlayerRepository;
pub use training_session::TrainingSessionRepository;
pub use user::UserRepository;
