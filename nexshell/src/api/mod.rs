//! Backend collaborator client.
//!
//! The Nexus REST API is consumed, never implemented, by the shell. This
//! module owns the two authentication endpoints the session core depends on
//! (`POST /auth/login`, `GET /auth/me`) and a bearer-attaching request
//! builder for the domain CRUD routes. Failures on domain routes are the
//! caller's responsibility to surface; the session core only reacts to
//! explicit hydration failure.

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{LoginResponse, UserProfile};
