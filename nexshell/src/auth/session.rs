//! The session state machine.
//!
//! One [`SessionManager`] exists per running shell. Consumers (route guard,
//! navigation filter, API calls) read cheap [`Session`] snapshots; all
//! mutation goes through the manager's own operations, which apply in
//! invocation order on the single logical thread of control.
//!
//! # Permission staleness
//!
//! Permissions are persisted at login time and retained across hydration,
//! because the identity endpoint is not guaranteed to resend them. A
//! permission revoked server-side is therefore not enforced locally until
//! the next login.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::api::models::UserProfile;
use crate::auth::permissions::PermissionSet;
use crate::auth::store::CredentialStore;
use crate::errors::Result;

/// Where the session is in its lifecycle.
///
/// `Initializing` is strictly transient: hydration resolves it to one of the
/// other two states exactly once per shell start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Authenticated,
    Anonymous,
}

/// Immutable snapshot of the authoritative identity state.
#[derive(Debug, Clone)]
pub struct Session {
    pub status: SessionStatus,
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub permissions: PermissionSet,
}

impl Session {
    fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            user: None,
            token: None,
            permissions: PermissionSet::new(),
        }
    }

    /// True iff the session is authenticated and `code` is an exact member
    /// of the permission set. False in every other case, including while
    /// the session is still initializing.
    pub fn has_permission(&self, code: &str) -> bool {
        self.status == SessionStatus::Authenticated && self.permissions.grants(code)
    }
}

/// Owns the session state and the credential store behind it.
pub struct SessionManager {
    store: CredentialStore,
    current: ArcSwap<Session>,
    // Bumped by login/logout; a hydration result is only applied if the
    // generation it started under is still current, so a result arriving
    // after a newer mutation is discarded rather than applied to a session
    // that has moved on.
    generation: AtomicU64,
}

impl SessionManager {
    /// Create the manager, seeding the session synchronously from whatever
    /// the credential store returns so a restart does not flash an
    /// anonymous state before hydration completes.
    pub fn new(store: CredentialStore) -> Self {
        let seed = match store.load() {
            Some(record) => Session {
                status: SessionStatus::Initializing,
                user: Some(record.user),
                token: Some(record.token),
                permissions: record.permissions,
            },
            None => Session {
                status: SessionStatus::Initializing,
                user: None,
                token: None,
                permissions: PermissionSet::new(),
            },
        };

        Self {
            store,
            current: ArcSwap::from_pointee(seed),
            generation: AtomicU64::new(0),
        }
    }

    /// Cheap snapshot for guard and filter consumers.
    pub fn snapshot(&self) -> Arc<Session> {
        self.current.load_full()
    }

    pub fn status(&self) -> SessionStatus {
        self.current.load().status
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.current.load().has_permission(code)
    }

    /// The stored bearer token, for authenticated calls to domain routes.
    pub fn token(&self) -> Option<String> {
        self.current.load().token.clone()
    }

    /// Reconcile the seeded session with the backend identity endpoint.
    ///
    /// - No token: resolve to `Anonymous` without a network call.
    /// - `GET /auth/me` succeeds: resolve to `Authenticated` with the server's
    ///   profile; permissions stay as last persisted.
    /// - Any failure: clear the store and resolve to `Anonymous`. Doubt about
    ///   credential validity revokes the session rather than trusting stale
    ///   local state.
    ///
    /// Always terminates in `Authenticated` or `Anonymous`. If a login or
    /// logout happened while the identity call was in flight, the result is
    /// discarded.
    pub async fn hydrate(&self, api: &ApiClient) {
        let generation = self.generation.load(Ordering::SeqCst);
        let token = self.current.load().token.clone();

        let Some(token) = token else {
            debug!("no stored token, session is anonymous");
            self.apply(generation, Session::anonymous());
            return;
        };

        match api.me(&token).await {
            Ok(user) => {
                let permissions = self.current.load().permissions.clone();
                let applied = self.apply(
                    generation,
                    Session {
                        status: SessionStatus::Authenticated,
                        user: Some(user),
                        token: Some(token),
                        permissions,
                    },
                );
                if applied {
                    debug!("session hydrated from identity endpoint");
                }
            }
            Err(e) => {
                info!("identity reconciliation failed ({e}), revoking session");
                if self.apply(generation, Session::anonymous())
                    && let Err(e) = self.store.clear()
                {
                    warn!("failed to clear rejected credentials: {e}");
                }
            }
        }
    }

    /// Install already-validated login results: persist the credential as a
    /// unit and transition to `Authenticated`.
    ///
    /// The network login call itself lives in [`ApiClient::login`]; if
    /// persistence fails nothing is applied and the session is unchanged,
    /// so no partial credential can outlive this call.
    pub fn login(&self, user: UserProfile, token: String, permissions: PermissionSet) -> Result<()> {
        self.store.save(&token, &user, &permissions)?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.current.store(Arc::new(Session {
            status: SessionStatus::Authenticated,
            user: Some(user),
            token: Some(token),
            permissions,
        }));
        Ok(())
    }

    /// Clear the credential store and transition to `Anonymous`.
    /// Idempotent; logging out an anonymous session is a no-op.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!("failed to clear credential store on logout: {e}");
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.current.store(Arc::new(Session::anonymous()));
    }

    /// Apply `session` only if no login/logout happened since `generation`
    /// was observed. Returns whether the result was applied.
    fn apply(&self, generation: u64, session: Session) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale hydration result");
            return false;
        }
        self.current.store(Arc::new(session));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;
    use tempfile::TempDir;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_user() -> UserProfile {
        UserProfile {
            id: 42,
            email: "ops@example.com".to_string(),
            is_active: true,
            created_at: None,
        }
    }

    fn test_permissions() -> PermissionSet {
        vec!["dashboard.read".to_string()].into()
    }

    fn api_for(server_uri: &str) -> ApiClient {
        let config = Config {
            api_base_url: Url::parse(&format!("{server_uri}/api/v1")).unwrap(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn me_body() -> serde_json::Value {
        serde_json::json!({"id": 42, "email": "ops@example.com", "is_active": true})
    }

    #[test]
    fn starts_initializing_with_stored_seed() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("tok-123", &test_user(), &test_permissions()).unwrap();

        let manager = SessionManager::new(store);
        let session = manager.snapshot();

        assert_eq!(session.status, SessionStatus::Initializing);
        assert_eq!(session.user.as_ref().unwrap().email, "ops@example.com");
        // Fail-closed: nothing is granted until hydration confirms the session
        assert!(!manager.has_permission("dashboard.read"));
    }

    #[test_log::test(tokio::test)]
    async fn hydrate_without_token_is_anonymous_with_zero_network_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(CredentialStore::new(dir.path()));
        manager.hydrate(&api_for(&server.uri())).await;

        assert_eq!(manager.status(), SessionStatus::Anonymous);
        server.verify().await;
    }

    #[test_log::test(tokio::test)]
    async fn hydrate_success_replaces_user_and_retains_permissions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"id": 42, "email": "renamed@example.com", "is_active": true}),
            ))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("tok-123", &test_user(), &test_permissions()).unwrap();

        let manager = SessionManager::new(store);
        manager.hydrate(&api_for(&server.uri())).await;

        let session = manager.snapshot();
        assert_eq!(session.status, SessionStatus::Authenticated);
        // Identity endpoint wins for the profile
        assert_eq!(session.user.as_ref().unwrap().email, "renamed@example.com");
        // Permissions stay as persisted at login; /auth/me does not resend them
        assert!(manager.has_permission("dashboard.read"));
    }

    #[test_log::test(tokio::test)]
    async fn hydrate_failure_clears_store_and_goes_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("expired", &test_user(), &test_permissions()).unwrap();

        let manager = SessionManager::new(CredentialStore::new(dir.path()));
        manager.hydrate(&api_for(&server.uri())).await;

        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(!manager.has_permission("dashboard.read"));
        assert!(store.load().is_none(), "rejected credentials must be wiped");
    }

    #[test_log::test(tokio::test)]
    async fn hydrate_transport_error_is_fail_closed() {
        // Nothing listening on this port
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("tok-123", &test_user(), &test_permissions()).unwrap();

        let manager = SessionManager::new(CredentialStore::new(dir.path()));
        manager.hydrate(&api_for("http://127.0.0.1:9")).await;

        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(store.load().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn login_grants_immediately_and_logout_revokes() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        let manager = SessionManager::new(CredentialStore::new(dir.path()));

        manager
            .login(
                test_user(),
                "tok-123".to_string(),
                vec!["users.read".to_string(), "audit.read".to_string()].into(),
            )
            .unwrap();

        assert_eq!(manager.status(), SessionStatus::Authenticated);
        assert!(manager.has_permission("users.read"));
        assert!(manager.has_permission("audit.read"));
        assert!(!manager.has_permission("crm.leads.read"));
        assert_eq!(manager.token().as_deref(), Some("tok-123"));
        assert!(store.load().is_some());

        manager.logout();
        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(!manager.has_permission("users.read"));
        assert!(manager.token().is_none());
        assert!(store.load().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn logout_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::new(CredentialStore::new(dir.path()));

        manager.logout();
        let first = manager.snapshot();
        manager.logout();
        let second = manager.snapshot();

        assert_eq!(first.status, SessionStatus::Anonymous);
        assert_eq!(second.status, SessionStatus::Anonymous);
        assert!(second.user.is_none());
        assert!(second.permissions.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn stale_hydration_result_is_discarded_after_logout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(me_body())
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("tok-123", &test_user(), &test_permissions()).unwrap();

        let manager = SessionManager::new(CredentialStore::new(dir.path()));
        let api = api_for(&server.uri());

        // Log out while the identity call is still in flight; the successful
        // result arriving afterwards must not resurrect the session.
        tokio::join!(manager.hydrate(&api), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            manager.logout();
        });

        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(store.load().is_none());
    }
}
