//! HTTP client for the Nexus backend.

use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::api::models::{ApiErrorBody, LoginResponse, UserProfile};
use crate::config::Config;
use crate::errors::{Error, Result};

/// Thin reqwest wrapper holding the resolved base URL.
///
/// One instance per shell invocation; cheap to clone (reqwest clients share
/// their connection pool).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        // A trailing slash makes Url::join treat the last segment as a
        // directory, which is what path concatenation below relies on.
        let mut base_url = config.api_base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Internal {
                operation: format!("build URL for {path}: {e}"),
            })
    }

    /// Authenticate against `POST /auth/login`.
    ///
    /// The backend speaks the OAuth2 password flow: credentials go as form
    /// fields named `username` and `password`. Any non-success response is an
    /// authentication failure; there is no retry.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint("auth/login")?;
        let response = self
            .http
            .post(url)
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status();
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| "Identity verification failed".to_string());
            debug!(%status, "login rejected by backend");
            Err(Error::LoginFailed { message })
        }
    }

    /// Fetch the current user profile from `GET /auth/me`.
    ///
    /// Any non-success response (expired/invalid token) and any transport
    /// error mean the session is invalid; the caller decides what to do
    /// with that.
    pub async fn me(&self, token: &str) -> Result<UserProfile> {
        let url = self.endpoint("auth/me")?;
        let response = self.http.get(url).bearer_auth(token).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Error::Api {
                status: response.status().as_u16(),
                path: "/auth/me".to_string(),
            })
        }
    }

    /// Build a request for an arbitrary backend route, attaching the stored
    /// token as a bearer credential when one is present.
    ///
    /// Failures on these routes are the caller's to surface; the session core
    /// does not intercept them or auto-logout on 401s outside hydration.
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> Result<reqwest::RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }
}
