//! The single-user login lifecycle.
//!
//! [`SessionManager`] owns the credential collection and the session slot,
//! both backed by one [`KeyValueStore`]. It publishes an [`AuthState`] on a
//! `watch` channel so the loading flag can be observed while an operation is
//! suspended on its [`Delay`].

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::models::{Identity, LoginCredentials, RegisterData, SessionUser};
use crate::storage::{KeyValueStore, SESSION_KEY, USERS_KEY};

use super::credentials::CredentialStore;
use super::delay::Delay;
use super::session::SessionSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// What the rest of the application sees of the login lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Authenticating
        } else if self.user.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

pub struct SessionManager<S, D> {
    storage: S,
    credentials: CredentialStore<S>,
    session: SessionSlot<S>,
    delay: D,
    state: watch::Sender<AuthState>,
}

impl<S, D> SessionManager<S, D>
where
    S: KeyValueStore + Clone,
    D: Delay,
{
    /// Seed the credential collection if needed and restore any persisted session
    pub fn new(storage: S, delay: D) -> Self {
        let credentials = CredentialStore::new(storage.clone());
        let session = SessionSlot::new(storage.clone());

        if let Err(e) = credentials.initialize_if_empty() {
            warn!(error = %e, "Failed to seed identity collection");
        }

        let user = match session.load() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session");
                None
            }
        };
        debug!(restored = user.is_some(), "Session manager initialized");

        let (state, _) = watch::channel(AuthState {
            user,
            is_loading: false,
        });

        Self {
            storage,
            credentials,
            session,
            delay,
            state,
        }
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    fn set_loading(&self, is_loading: bool) {
        self.state.send_modify(|state| state.is_loading = is_loading);
    }

    /// Authenticate against the credential collection.
    ///
    /// On failure the previous state is kept and `false` is returned; wrong
    /// secret, unknown email and storage failures are not distinguished.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> bool {
        self.set_loading(true);
        self.delay.wait().await;

        if !credentials.is_complete() {
            debug!("Login rejected: email and password required");
            self.set_loading(false);
            return false;
        }

        let Some(identity) = self
            .credentials
            .find_by_email_and_secret(&credentials.email, &credentials.password)
        else {
            info!(email = %credentials.email, "Login failed");
            self.set_loading(false);
            return false;
        };

        let user = identity.to_session();
        if let Err(e) = self.session.save(&user) {
            error!(error = %e, "Failed to persist session");
            self.set_loading(false);
            return false;
        }

        info!(id = %user.id, admin = user.is_admin, "Login successful");
        self.state.send_replace(AuthState {
            user: Some(user),
            is_loading: false,
        });
        true
    }

    /// Create a new, non-admin identity. Does not log in.
    pub async fn register(&mut self, data: RegisterData) -> bool {
        self.set_loading(true);
        self.delay.wait().await;

        let registered = self.try_register(data);
        self.set_loading(false);
        registered
    }

    fn try_register(&self, data: RegisterData) -> bool {
        if !data.is_complete() {
            debug!("Registration rejected: every field is required");
            return false;
        }

        if self.credentials.email_exists(&data.email) {
            info!(email = %data.email, "Registration rejected: email already registered");
            return false;
        }

        let identity = Identity::from_registration(data, Utc::now());
        let id = identity.id.clone();
        match self.credentials.append(identity) {
            Ok(()) => {
                info!(%id, "Registered new identity");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to store new identity");
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.state.send_replace(AuthState::default());
        info!("Logged out");
    }

    /// Set the logged-in user's point balance in both the session and the
    /// credential collection. Does nothing when logged out.
    pub fn update_points(&mut self, points: i64) -> Result<()> {
        let Some(current) = self.user() else {
            debug!("Ignoring point update while logged out");
            return Ok(());
        };

        let updated = current.with_points(points);
        let mut writes = vec![(SESSION_KEY, SessionSlot::<S>::serialize(&updated)?)];
        match self.credentials.points_update_payload(&updated.id, points)? {
            Some(users) => writes.push((USERS_KEY, users)),
            None => warn!(id = %updated.id, "Session user missing from identity collection"),
        }
        self.storage.set_many(&writes)?;

        debug!(id = %updated.id, points, "Updated points");
        self.state.send_modify(|state| state.user = Some(updated));
        Ok(())
    }
}
