use crate::error::{Result, StoreError};
use crate::models::SessionUser;
use crate::storage::{KeyValueStore, SESSION_KEY};

/// The persisted slot holding the logged-in user.
pub struct SessionSlot<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionSlot<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the persisted session, `None` when logged out
    pub fn load(&self) -> Result<Option<SessionUser>> {
        match self.storage.get(SESSION_KEY)? {
            Some(contents) if !contents.is_empty() => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|e| StoreError::deserialization(SESSION_KEY, e)),
            _ => Ok(None),
        }
    }

    pub fn save(&self, user: &SessionUser) -> Result<()> {
        self.storage.set(SESSION_KEY, &Self::serialize(user)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(SESSION_KEY)
    }

    pub(crate) fn serialize(user: &SessionUser) -> Result<String> {
        serde_json::to_string(user).map_err(StoreError::Serialization)
    }
}
