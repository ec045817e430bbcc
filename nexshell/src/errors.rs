use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// No authenticated session where one is required
    #[error("Not authenticated")]
    Unauthenticated,

    /// The backend rejected a login attempt (bad credentials, inactive user)
    #[error("Login failed: {message}")]
    LoginFailed { message: String },

    /// Non-success response from the backend outside the login flow
    #[error("Backend returned {status} for {path}")]
    Api { status: u16, path: String },

    /// Transport-level failure talking to the backend
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Credential storage I/O failure
    #[error("Failed to {operation}")]
    Storage {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

impl Error {
    /// Returns a user-safe message, without leaking internal implementation details.
    ///
    /// Transport and storage details go to the logs; the user sees a short,
    /// actionable line. Login failure is the only core error that carries a
    /// backend-provided message through to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated => "Not signed in. Run `nexshell login` first.".to_string(),
            Error::LoginFailed { message } => message.clone(),
            Error::Api { status, .. } => format!("The server rejected the request ({status})"),
            Error::Http(_) => "Could not reach the server".to_string(),
            Error::Storage { .. } => "Could not access the local credential store".to_string(),
            Error::Internal { .. } => "Internal error".to_string(),
        }
    }
}

/// Type alias for shell operation results
pub type Result<T> = std::result::Result<T, Error>;
