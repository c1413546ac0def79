//! Custom Axum extractors.

pub mod rejection;
pub mod setup_token;

pub use rejection::{JsonBody, PathParams, QueryParams};
pub use setup_token::{SetupToken, SETUP_TOKEN_HEADER};
