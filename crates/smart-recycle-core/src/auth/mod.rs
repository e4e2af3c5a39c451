//! Authentication module for the single-user account flow.
//!
//! This module provides:
//! - `CredentialStore`: the persisted collection of registered identities
//! - `SessionSlot`: the persisted record of who is logged in
//! - `SessionManager`: login, registration, logout and point updates
//! - `Delay`: the simulated round-trip login and registration wait on
//!
//! Secrets are compared verbatim; nothing here hashes passwords.

pub mod credentials;
pub mod delay;
pub mod manager;
pub mod session;

pub use credentials::CredentialStore;
pub use delay::{Delay, FixedDelay, NoDelay, DEFAULT_DELAY_MS};
pub use manager::{AuthState, AuthStatus, SessionManager};
pub use session::SessionSlot;
