//! Session management
//!
//! [`SessionManager`] owns the signed-in viewer. It is built explicitly
//! from a transport, a store and a notifier, and shared by reference; the
//! transport picks the token up from the same store on every request.

mod notify;
mod persist;
pub mod token;

pub use notify::{LogNotifier, Notification, Notifier, NotifyLevel};
pub use persist::{clear_session, restore_session, save_session};

#[cfg(test)]
pub(crate) use notify::RecordingNotifier;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::models::{LoginRequest, Role, Session};
use crate::services::AuthService;
use crate::storage::SessionStore;
use crate::transport::ApiTransport;
use crate::validation::{
    validate_change_password, validate_login, validate_register, ChangePasswordForm, RegisterForm,
};

/// The one message a failed login reports, whatever the cause
pub const LOGIN_FAILED: &str = "Invalid email or password";

/// The one message a failed registration reports, whatever the cause
pub const REGISTER_FAILED: &str = "Unable to create your account";

pub struct SessionManager {
    auth: AuthService,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    current: RwLock<Option<Session>>,
    loading: AtomicBool,
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth: AuthService::new(transport),
            store,
            notifier,
            current: RwLock::new(None),
            loading: AtomicBool::new(true),
        }
    }

    /// Restore the persisted session. Never fails: anything unusable leaves
    /// the viewer signed out and the stale keys removed.
    pub async fn initialize(&self) {
        self.loading.store(true, Ordering::Release);

        let restored = match restore_session(self.store.as_ref()) {
            Ok(Some(session)) if token::is_expired(&session.access_token) => {
                log::info!("[session] Stored session for user {} has expired", session.user_id);
                self.discard_stored();
                None
            }
            Ok(Some(session)) => {
                log::info!("[session] Restored session for user {}", session.user_id);
                Some(session)
            }
            Ok(None) => {
                log::debug!("[session] No stored session");
                None
            }
            Err(e) => {
                log::warn!("[session] Could not restore session: {}", e);
                self.discard_stored();
                None
            }
        };

        self.set_current(restored);
        self.loading.store(false, Ordering::Release);
    }

    /// Sign in. Validation errors come back as they are; every other failure
    /// is reported as [`LOGIN_FAILED`] with the cause logged.
    pub async fn login(&self, credentials: LoginRequest) -> Result<Session> {
        validate_login(&credentials)?;

        let result = match self.auth.login(&credentials).await {
            Ok(response) => self.establish(Session::from_response(response)),
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                log::info!("[session] User {} logged in", session.user_id);
                self.notify(Notification::success(
                    "Login successful",
                    format!("Welcome back, {}!", session.display_name()),
                ));
                Ok(session)
            }
            Err(e) => {
                log::warn!("[session] Login failed: {}", e);
                self.notify(Notification::failure(
                    "Login failed",
                    "Invalid email or password. Please try again.",
                ));
                Err(Error::auth(LOGIN_FAILED))
            }
        }
    }

    /// Create an account and sign in with it. Same failure contract as
    /// [`login`](Self::login).
    pub async fn register(&self, form: RegisterForm) -> Result<Session> {
        validate_register(&form)?;

        let result = match self.auth.register(&form.to_request()).await {
            Ok(response) => self.establish(Session::from_response(response)),
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                log::info!("[session] User {} registered", session.user_id);
                self.notify(Notification::success(
                    "Registration successful",
                    format!("Welcome to Bookworm, {}!", session.display_name()),
                ));
                Ok(session)
            }
            Err(e) => {
                log::warn!("[session] Registration failed: {}", e);
                self.notify(Notification::failure(
                    "Registration failed",
                    "Unable to create your account. Please try again.",
                ));
                Err(Error::auth(REGISTER_FAILED))
            }
        }
    }

    /// Change the password of the signed-in viewer. The viewer stays signed
    /// in whatever happens.
    pub async fn change_password(&self, form: ChangePasswordForm) -> Result<()> {
        let current = self.require("You must be logged in to change your password")?;
        validate_change_password(&form)?;

        match self.auth.change_password(&form.to_request()).await {
            Ok(response) => {
                // A reply without a token keeps the current one.
                let updated = response
                    .and_then(Session::from_response)
                    .unwrap_or(current);
                if let Err(e) = save_session(self.store.as_ref(), &updated) {
                    log::warn!("[session] Could not persist session after password change: {}", e);
                }
                self.set_current(Some(updated));
                self.notify(Notification::success(
                    "Password updated",
                    "Your password has been successfully changed.",
                ));
                Ok(())
            }
            Err(e) => {
                log::warn!("[session] Password change failed: {}", e);
                self.notify(Notification::failure(
                    "Failed to change password",
                    "Please check your current password and try again.",
                ));
                Err(e)
            }
        }
    }

    /// Forget the session in memory and in storage. Never fails.
    pub fn logout(&self) {
        if let Err(e) = clear_session(self.store.as_ref()) {
            log::warn!("[session] Could not clear stored session: {}", e);
        }
        self.set_current(None);
        log::info!("[session] Logged out");
        self.notify(Notification::success(
            "Logged out",
            "You have been successfully logged out.",
        ));
    }

    // ── Readers ──────────────────────────────────────────────

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user_role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// True until [`initialize`](Self::initialize) has finished
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// The current session, or an authentication error with `message`
    pub fn require(&self, message: &str) -> Result<Session> {
        self.current().ok_or_else(|| Error::auth(message))
    }

    // ── Internals ────────────────────────────────────────────

    /// Persist a fresh session and make it current. On a storage failure
    /// the previous state is put back.
    fn establish(&self, session: Option<Session>) -> Result<Session> {
        let session = session.ok_or_else(|| Error::auth("response carried no access token"))?;
        if let Err(e) = save_session(self.store.as_ref(), &session) {
            self.rollback_store();
            return Err(e);
        }
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    fn rollback_store(&self) {
        let restored = match self.current() {
            Some(previous) => save_session(self.store.as_ref(), &previous),
            None => clear_session(self.store.as_ref()),
        };
        if let Err(e) = restored {
            log::warn!("[session] Could not restore previous session state: {}", e);
        }
    }

    fn discard_stored(&self) {
        if let Err(e) = clear_session(self.store.as_ref()) {
            log::warn!("[session] Could not clear stored session: {}", e);
        }
    }

    fn set_current(&self, session: Option<Session>) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}
