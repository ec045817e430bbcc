//! Session and capability subsystem.
//!
//! This is the core of the shell: it establishes identity from a persisted
//! credential, resolves the associated permission-code set, and answers the
//! capability questions the route guard and navigation filter ask.
//!
//! # Lifecycle
//!
//! A session starts `Initializing`, seeded synchronously from whatever the
//! credential store holds so a restart does not flash an anonymous state.
//! Hydration then reconciles with the backend identity endpoint and resolves
//! the session to `Authenticated` or `Anonymous` exactly once. Login and
//! logout replace the session wholesale.
//!
//! # Fail-closed
//!
//! Any uncertainty about credential validity resolves to "no access":
//! corrupt stored records load as absent, a rejected or unreachable
//! `/auth/me` revokes the session and wipes the store, and no capability is
//! granted before the session is confirmed authenticated.
//!
//! # Modules
//!
//! - [`store`]: durable credential persistence (token + user + permissions
//!   written and cleared as a unit)
//! - [`session`]: the session state machine and its mutations
//! - [`permissions`]: exact-match permission evaluation

pub mod permissions;
pub mod session;
pub mod store;

pub use permissions::PermissionSet;
pub use session::{Session, SessionManager, SessionStatus};
pub use store::{CredentialRecord, CredentialStore};
