//! Domain models for Coach Tracker.

pub mod invitation;
pub mod notification;
pub mod player;
pub mod training_session;
pub mod user;

pub use invitation::{Invitation, InvitationStatus, InvitationView};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use player::Player;
pub use training_session::TrainingSession;
pub use user::{
    AdminOverview, BootstrapAdminRequest, LoginRequest, LoginResponse, User, UserActivity, UserRole,
};
