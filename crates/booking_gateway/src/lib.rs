//! Booking Gateway Service
//!
//! Authenticated reverse proxy between the room-booking dashboard and the
//! upstream booking API.
//!
//! # Features
//! - Login/registration relay that stores the issued credential as browser cookies
//! - Table-driven CRUD relay for rooms, bookings and categories
//! - Verbatim status relay with JSON-or-raw-text body decoding
//! - Navigation guard for dashboard pages

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod upstream;

pub use auth::{Credential, GuardDecision, TokenStore};
pub use config::{CookieSettings, GatewayConfig, TtlPolicy};
pub use error::GatewayError;
pub use server::{router, start_server, AppState};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};
