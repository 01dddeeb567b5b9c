/*
[INPUT]:  Login/registration form credentials, Transport, SessionStore
[OUTPUT]: Stored Session on login, notifications for every outcome
[POS]:    Auth layer - orchestrates login, registration and logout
[UPDATE]: When auth flow, validation rules or offline behaviour change
*/

use std::fmt;
use std::sync::Arc;

use linkflow_adapter::{LoginRequest, RegisterRequest, Transport};
use uuid::Uuid;

use crate::error::{AuthError, ValidationError};
use crate::notify::{Notification, NotificationSink};
use crate::session::{Session, SessionStore};

const LOGIN_SUCCESS: &str = "Login successful!";
const REGISTER_SUCCESS: &str = "Registration successful! Please login.";
const LOGIN_FAILED: &str = "Authentication failed";
const REGISTER_FAILED: &str = "Registration failed";
const OFFLINE_TOKEN_PREFIX: &str = "offline-";

/// Form input for a single submit attempt; never persisted
#[derive(Clone, Default)]
pub struct Credentials {
    pub login_id: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

impl Credentials {
    pub fn login(login_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_id: login_id.into(),
            password: password.into(),
            confirm_password: None,
        }
    }

    pub fn register(
        login_id: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            login_id: login_id.into(),
            password: password.into(),
            confirm_password: Some(confirm_password.into()),
        }
    }

    fn require_fields(&self) -> Result<(), ValidationError> {
        if self.login_id.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Runs before the session is cleared on logout
pub type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// Drives login and registration against the backend.
///
/// Offline fallbacks are opt-in per operation: an unreachable backend is an
/// error unless [`with_offline_login`](Self::with_offline_login) /
/// [`with_offline_register`](Self::with_offline_register) enabled it.
#[derive(Clone)]
pub struct AuthController {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn NotificationSink>,
    offline_login: bool,
    offline_register: bool,
    logout_hook: Option<LogoutHook>,
}

impl AuthController {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            transport,
            store,
            sink,
            offline_login: false,
            offline_register: false,
            logout_hook: None,
        }
    }

    /// Synthesize a local session when the backend is unreachable
    pub fn with_offline_login(mut self, enabled: bool) -> Self {
        self.offline_login = enabled;
        self
    }

    /// Report registration success when the backend is unreachable
    pub fn with_offline_register(mut self, enabled: bool) -> Self {
        self.offline_register = enabled;
        self
    }

    /// Stop session-bound work (e.g. a running task) whenever logout is called
    pub fn on_logout(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.logout_hook = Some(Arc::new(hook));
        self
    }

    pub fn current_session(&self) -> Option<Session> {
        self.store.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Exchange credentials for a session and persist it
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if let Err(err) = credentials.require_fields() {
            return Err(self.report(err.into()));
        }

        let request = LoginRequest {
            login_id: credentials.login_id.clone(),
            password: credentials.password.clone(),
        };

        match self.transport.login(&request).await {
            Ok(response) => {
                if response.session_token.trim().is_empty() {
                    return Err(self.report(AuthError::InvalidResponse(
                        "login response carried an empty token".to_string(),
                    )));
                }
                let session = Session::new(response.session_token);
                self.store
                    .set(session.clone())
                    .map_err(|err| self.report(err.into()))?;
                tracing::info!(login_id = %credentials.login_id, "logged in");
                self.sink.notify(Notification::success(LOGIN_SUCCESS));
                Ok(session)
            }
            Err(err) if err.is_unreachable() && self.offline_login => {
                tracing::warn!(
                    login_id = %credentials.login_id,
                    error = %err,
                    "backend unreachable, using offline session"
                );
                let session = Session::new(format!("{OFFLINE_TOKEN_PREFIX}{}", Uuid::new_v4()));
                self.store
                    .set(session.clone())
                    .map_err(|err| self.report(err.into()))?;
                self.sink
                    .notify(Notification::success(LOGIN_SUCCESS).simulated());
                Ok(session)
            }
            Err(err) => Err(self.report(AuthError::from_transport(err, LOGIN_FAILED))),
        }
    }

    /// Create an account; the user logs in separately afterwards
    pub async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if let Err(err) = credentials.require_fields() {
            return Err(self.report(err.into()));
        }
        if credentials.confirm_password.as_deref() != Some(credentials.password.as_str()) {
            return Err(self.report(ValidationError::PasswordMismatch.into()));
        }

        let request = RegisterRequest {
            login_id: credentials.login_id.clone(),
            password: credentials.password.clone(),
        };

        match self.transport.register(&request).await {
            Ok(()) => {
                tracing::info!(login_id = %credentials.login_id, "registered");
                self.sink.notify(Notification::success(REGISTER_SUCCESS));
                Ok(())
            }
            Err(err) if err.is_unreachable() && self.offline_register => {
                tracing::warn!(
                    login_id = %credentials.login_id,
                    error = %err,
                    "backend unreachable, reporting offline registration"
                );
                self.sink
                    .notify(Notification::success(REGISTER_SUCCESS).simulated());
                Ok(())
            }
            Err(err) => Err(self.report(AuthError::from_transport(err, REGISTER_FAILED))),
        }
    }

    /// Run the logout hook, then forget the current session
    pub fn logout(&self) -> Result<(), AuthError> {
        if let Some(hook) = &self.logout_hook {
            hook();
        }
        self.store.clear().map_err(|err| self.report(err.into()))?;
        tracing::info!("logged out");
        Ok(())
    }

    fn report(&self, err: AuthError) -> AuthError {
        match &err {
            AuthError::Validation(_) => tracing::debug!(error = %err, "auth input rejected"),
            _ => tracing::warn!(error = %err, "auth operation failed"),
        }
        self.sink.notify(Notification::error(user_message(&err)));
        err
    }
}

fn user_message(err: &AuthError) -> String {
    match err {
        AuthError::TransportUnavailable(_) => {
            "Unable to reach the server. Please try again later.".to_string()
        }
        other => other.to_string(),
    }
}
