//! Route guard: the decision function gating access to protected views.
//!
//! The check order is significant: loading before authentication, and
//! authentication before permission. An in-flight hydration must never
//! trigger a premature login redirect, and a missing capability on an
//! authenticated session downgrades silently to the landing route instead
//! of bouncing to login.

use crate::auth::session::{Session, SessionStatus};

/// What to do with a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Hydration is still in flight; show a neutral placeholder and decide later.
    Loading,
    /// No session; go to the login route, remembering where the user wanted to go.
    RedirectToLogin { return_to: String },
    /// Authenticated but missing the required capability; silent downgrade
    /// to the default landing route.
    RedirectToDefault,
    /// Admit: render the requested view.
    Render,
}

/// A protected view and the capability it requires.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub path: &'static str,
    pub required_permission: Option<&'static str>,
}

/// Static route table. Paths and permission codes mirror the backend's
/// resource endpoints one-to-one.
pub const ROUTES: &[RouteSpec] = &[
    RouteSpec { path: "/dashboard", required_permission: Some("dashboard.read") },
    RouteSpec { path: "/hr/employees", required_permission: Some("hr.employees.read") },
    RouteSpec { path: "/hr/leave", required_permission: Some("hr.leave.read") },
    RouteSpec { path: "/crm/customers", required_permission: Some("crm.customers.read") },
    RouteSpec { path: "/crm/leads", required_permission: Some("crm.leads.read") },
    RouteSpec { path: "/crm/opportunities", required_permission: Some("crm.opportunities.read") },
    RouteSpec { path: "/inventory", required_permission: Some("inv.products.read") },
    RouteSpec { path: "/users", required_permission: Some("users.read") },
    RouteSpec { path: "/audit-log", required_permission: Some("audit.read") },
];

/// Look up a path in the static route table.
pub fn find_route(path: &str) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|route| route.path == path)
}

/// Decide whether to render `target`, given the current session and the
/// permission the route requires (if any).
pub fn decide(session: &Session, required_permission: Option<&str>, target: &str) -> RouteDecision {
    match session.status {
        SessionStatus::Initializing => RouteDecision::Loading,
        SessionStatus::Anonymous => RouteDecision::RedirectToLogin {
            return_to: target.to_string(),
        },
        SessionStatus::Authenticated => match required_permission {
            Some(code) if !session.has_permission(code) => RouteDecision::RedirectToDefault,
            _ => RouteDecision::Render,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::PermissionSet;

    fn session(status: SessionStatus, codes: &[&str]) -> Session {
        Session {
            status,
            user: None,
            token: None,
            permissions: codes.iter().map(|c| c.to_string()).collect::<PermissionSet>(),
        }
    }

    #[test]
    fn initializing_always_loads_regardless_of_permission() {
        let s = session(SessionStatus::Initializing, &["dashboard.read"]);

        assert_eq!(decide(&s, None, "/dashboard"), RouteDecision::Loading);
        assert_eq!(decide(&s, Some("dashboard.read"), "/dashboard"), RouteDecision::Loading);
        assert_eq!(decide(&s, Some("hr.leave.read"), "/hr/leave"), RouteDecision::Loading);
    }

    #[test]
    fn anonymous_redirects_to_login_with_return_context() {
        let s = session(SessionStatus::Anonymous, &[]);

        assert_eq!(
            decide(&s, Some("hr.leave.read"), "/hr/leave"),
            RouteDecision::RedirectToLogin {
                return_to: "/hr/leave".to_string()
            }
        );
    }

    #[test]
    fn missing_permission_downgrades_to_default_not_login() {
        let s = session(SessionStatus::Authenticated, &["dashboard.read"]);

        assert_eq!(
            decide(&s, Some("hr.leave.read"), "/hr/leave"),
            RouteDecision::RedirectToDefault
        );
    }

    #[test]
    fn granted_permission_renders() {
        let s = session(SessionStatus::Authenticated, &["crm.leads.read"]);

        assert_eq!(decide(&s, Some("crm.leads.read"), "/crm/leads"), RouteDecision::Render);
    }

    #[test]
    fn unguarded_route_renders_for_any_authenticated_session() {
        let s = session(SessionStatus::Authenticated, &[]);

        assert_eq!(decide(&s, None, "/profile"), RouteDecision::Render);
    }

    #[test]
    fn route_table_lookup() {
        assert_eq!(find_route("/hr/leave").unwrap().required_permission, Some("hr.leave.read"));
        assert!(find_route("/nope").is_none());
    }
}
