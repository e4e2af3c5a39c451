//! Data models for Smart Recycle accounts.
//!
//! - `Identity`: a registered user as stored in the credential collection
//! - `SessionUser`: the logged-in projection of an identity, without secret
//! - `LoginCredentials`, `RegisterData`: form input for login and sign-up
//! - `DemoAccount`: quick-login shortcuts for the seeded accounts

pub mod user;

pub use user::{default_identities, DemoAccount, Identity, LoginCredentials, RegisterData, SessionUser};
