//! Async client for the Poshuk missing-persons registry API.
//!
//! Every operation returns a typed result; callers never catch raw
//! transport errors. Reads ride on the cookie-credentialed session;
//! mutations additionally carry the session's anti-forgery token as
//! `X-CSRFToken`. The client performs no retries and keeps no local state —
//! each call is one request, and cancellation is dropping the future.

pub mod auth;
pub mod client;
pub mod error;
pub mod records;
pub mod search;

pub use auth::Session;
pub use client::{ApiClient, ApiConfig, CsrfToken};
pub use error::{Error, Result};
