use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{default_identities, Identity};
use crate::storage::{KeyValueStore, USERS_KEY};

/// The persisted collection of registered identities.
///
/// The whole collection is read and written as one JSON array in the
/// [`USERS_KEY`] slot.
pub struct CredentialStore<S> {
    storage: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Seed the default identities when no collection has been stored yet.
    /// Returns true if seeding happened.
    pub fn initialize_if_empty(&self) -> Result<bool> {
        match self.storage.get(USERS_KEY)? {
            Some(contents) if !contents.is_empty() => Ok(false),
            _ => {
                let defaults = default_identities();
                self.save(&defaults)?;
                info!(count = defaults.len(), "Seeded default identities");
                Ok(true)
            }
        }
    }

    /// Every stored identity, in stored order. Malformed content reads as empty.
    pub fn all(&self) -> Vec<Identity> {
        match self.load() {
            Ok(identities) => identities,
            Err(e) => {
                warn!(error = %e, "Treating unreadable identity collection as empty");
                Vec::new()
            }
        }
    }

    /// First identity whose email and secret both match exactly
    pub fn find_by_email_and_secret(&self, email: &str, secret: &str) -> Option<Identity> {
        self.all()
            .into_iter()
            .find(|identity| identity.matches_credentials(email, secret))
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.all().iter().any(|identity| identity.email == email)
    }

    /// Add an identity at the end of the collection.
    ///
    /// Callers check [`email_exists`](Self::email_exists) first; no uniqueness
    /// check happens here.
    pub fn append(&self, identity: Identity) -> Result<()> {
        let mut identities = self.load()?;
        debug!(id = %identity.id, "Appending identity");
        identities.push(identity);
        self.save(&identities)
    }

    /// Set the point balance of the first identity with `id`.
    /// Returns false when no identity has that id.
    pub fn update_points(&self, id: &str, points: i64) -> Result<bool> {
        let mut identities = self.load()?;
        if !Self::apply_points(&mut identities, id, points) {
            return Ok(false);
        }
        self.save(&identities)?;
        Ok(true)
    }

    /// Serialized collection with the points of `id` replaced, ready to be
    /// written in a batch with other slots. `None` when no identity matches.
    pub(crate) fn points_update_payload(&self, id: &str, points: i64) -> Result<Option<String>> {
        let mut identities = self.load()?;
        if !Self::apply_points(&mut identities, id, points) {
            return Ok(None);
        }
        serde_json::to_string(&identities)
            .map(Some)
            .map_err(StoreError::Serialization)
    }

    fn apply_points(identities: &mut [Identity], id: &str, points: i64) -> bool {
        match identities.iter_mut().find(|identity| identity.id == id) {
            Some(identity) => {
                identity.points = points;
                true
            }
            None => false,
        }
    }

    fn load(&self) -> Result<Vec<Identity>> {
        let contents = match self.storage.get(USERS_KEY)? {
            Some(contents) if !contents.is_empty() => contents,
            _ => return Ok(Vec::new()),
        };
        serde_json::from_str(&contents).map_err(|e| {
            debug!(content = %StoreError::truncate_content(&contents), "Malformed identity collection");
            StoreError::deserialization(USERS_KEY, e)
        })
    }

    fn save(&self, identities: &[Identity]) -> Result<()> {
        let contents = serde_json::to_string(identities).map_err(StoreError::Serialization)?;
        self.storage.set(USERS_KEY, &contents)
    }
}
