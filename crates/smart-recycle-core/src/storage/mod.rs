//! Key-value persistence for account state.
//!
//! Everything the account flow persists lives in two string slots holding
//! JSON text, the same layout a browser keeps in local storage:
//!
//! | Slot | Contents |
//! |------|----------|
//! | [`USERS_KEY`] | array of every registered identity |
//! | [`SESSION_KEY`] | the logged-in user, absent when logged out |
//!
//! [`KeyValueStore`] abstracts over where the slots live. [`MemoryStore`] keeps
//! them in process memory (tests, ephemeral runs) and [`FileStore`] keeps one
//! JSON file per slot under a data directory.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Slot holding the serialized identity collection
pub const USERS_KEY: &str = "registeredUsers";

/// Slot holding the serialized session record
pub const SESSION_KEY: &str = "smartRecycleUser";

/// String-keyed storage of string values.
///
/// Methods take `&self`; implementations use interior mutability so that a
/// cloned handle observes the same slots.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several slots. Backends that can apply the batch atomically
    /// override this; the default writes in order and stops at the first error.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}
