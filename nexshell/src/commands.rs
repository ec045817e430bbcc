//! CLI subcommands.
//!
//! Each command wires the session core together the same way: build the
//! credential store, seed the session manager from it, hydrate against the
//! backend where identity matters, then consult the guard or filter. This is
//! the only module that prints to stdout.

use clap::Subcommand;

use crate::api::ApiClient;
use crate::auth::session::SessionStatus;
use crate::auth::store::CredentialStore;
use crate::auth::SessionManager;
use crate::config::Config;
use crate::errors::{Error, Result};
use crate::nav;
use crate::routes::{self, RouteDecision};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in to the backend and persist the credential
    Login {
        /// Account email address
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long, env = "NEXSHELL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the persisted credential
    Logout,
    /// Show the identity of the current session
    Whoami,
    /// Show the navigation menu visible to the current session
    Menu,
    /// Check what navigating to a route would do for the current session
    Open {
        /// Route path, e.g. /hr/leave
        path: String,
    },
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
    let store = CredentialStore::new(config.credentials_dir());
    let manager = SessionManager::new(store);
    let api = ApiClient::new(config)?;

    match command {
        Command::Login { email, password } => {
            let response = api.login(&email, &password).await?;
            manager.login(response.user, response.access_token, response.permissions.into())?;

            let session = manager.snapshot();
            println!(
                "Signed in as {} ({} permissions)",
                session.user.as_ref().map(|u| u.email.as_str()).unwrap_or(email.as_str()),
                session.permissions.len()
            );
        }

        Command::Logout => {
            manager.logout();
            println!("Signed out.");
        }

        Command::Whoami => {
            manager.hydrate(&api).await;
            let session = manager.snapshot();
            match (session.status, &session.user) {
                (SessionStatus::Authenticated, Some(user)) => {
                    println!("{}", user.email);
                    println!("permissions: {}", session.permissions.len());
                }
                _ => return Err(Error::Unauthenticated),
            }
        }

        Command::Menu => {
            manager.hydrate(&api).await;
            let session = manager.snapshot();
            if session.status != SessionStatus::Authenticated {
                return Err(Error::Unauthenticated);
            }

            let menu = nav::visible_menu(&session);
            if menu.is_empty() {
                println!("No sections are visible to this account.");
            }
            for section in menu {
                println!("{}", section.title);
                for item in section.items {
                    println!("  {:<14} {}", item.title, item.path);
                }
            }
        }

        Command::Open { path } => {
            manager.hydrate(&api).await;
            let session = manager.snapshot();

            let (required, target) = resolve_target(&path, config);
            if target != path {
                println!("No view at {path}; falling back to {target}");
            }

            match routes::decide(&session, required, &target) {
                RouteDecision::Render => println!("Rendering {target}"),
                RouteDecision::RedirectToDefault => {
                    println!("Redirected to {} (missing permission)", config.default_route)
                }
                RouteDecision::RedirectToLogin { return_to } => {
                    println!("Redirected to {} (sign in to continue to {return_to})", config.login_route)
                }
                RouteDecision::Loading => println!("Session is still initializing; try again"),
            }
        }
    }

    Ok(())
}

/// Resolve a requested path against the route table. Unknown paths fall
/// through to the default landing route, which is then guarded like any
/// other navigation.
fn resolve_target(path: &str, config: &Config) -> (Option<&'static str>, String) {
    match routes::find_route(path) {
        Some(route) => (route.required_permission, path.to_string()),
        None => (
            routes::find_route(&config.default_route).and_then(|route| route.required_permission),
            config.default_route.clone(),
        ),
    }
}
