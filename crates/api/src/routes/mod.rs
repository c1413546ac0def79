//! HTTP route handlers.

use serde::Serialize;

pub mod admin;
pub mod auth;
pub mod charts;
pub mod health;
pub mod invitations;
pub mod notifications;
pub mod players;
pub mod sessions;

/// `{"ok": true}` acknowledgement body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
