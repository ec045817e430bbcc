//! # nexshell: client shell for the ERP Nexus platform
//!
//! `nexshell` is a command-line shell for an enterprise REST backend. Its
//! core is a client-side session and capability subsystem: it establishes
//! identity from a persisted credential, resolves the associated set of
//! fine-grained permission codes, and uses that set to gate both route
//! access and menu visibility. The backend (authentication plus domain CRUD
//! routes) is an external collaborator the shell consumes but never
//! implements.
//!
//! ## How a session comes to be
//!
//! On startup the [`auth::SessionManager`] seeds itself synchronously from
//! the [`auth::CredentialStore`], so a restart never flashes an anonymous
//! state while the network is still being consulted. It then *hydrates*:
//! if a token is stored, `GET /auth/me` reconciles the local profile with
//! the backend's live view; if anything about that call fails, the stored
//! credential is wiped and the session resolves to anonymous. Every session
//! resolves exactly once, to either authenticated or anonymous.
//!
//! The policy throughout is fail-closed: a corrupt credential record, a
//! rejected token, and an unreachable backend all resolve to "no access".
//! No capability is granted while the session is still initializing.
//!
//! ## Gating
//!
//! Two pure consumers read session snapshots:
//!
//! - [`routes::decide`] gates a single navigation: loading placeholder
//!   while initializing, login redirect when anonymous, silent downgrade to
//!   the landing route when a capability is missing, render otherwise.
//! - [`nav::visible_menu`] prunes the static menu to the entries the
//!   session's permission set allows, dropping emptied sections.
//!
//! Permission codes are opaque strings matched exactly; `"crm.read"` grants
//! nothing about `"crm.customers.read"`.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use nexshell::{commands, config::{Args, Config}, telemetry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let args = Args::parse();
//!     let config = Config::load(&args)?;
//!     telemetry::init_telemetry()?;
//!
//!     if let Some(command) = args.command {
//!         commands::run(command, &config).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for the YAML/environment layering.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod errors;
pub mod nav;
pub mod routes;
pub mod telemetry;

pub use config::Config;
pub use errors::{Error, Result};
