//! Smart Recycle core - local account storage and session handling.
//!
//! Registered identities and the logged-in user are kept in two JSON slots
//! of a [`storage::KeyValueStore`]. [`auth::SessionManager`] drives login,
//! registration, logout and reward-point updates on top of them.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use auth::{AuthState, AuthStatus, CredentialStore, SessionManager};
pub use config::Config;
pub use error::{Result, StoreError};
pub use models::{DemoAccount, Identity, LoginCredentials, RegisterData, SessionUser};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
