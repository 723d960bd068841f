//! Session handoff between the submission view and the results view.
//!
//! Nothing in memory survives the navigation between the two views, so the
//! submission view leaves exactly two typed slots behind:
//!
//! | Slot | Key | Backend |
//! |------|-----|---------|
//! | uploaded image (data URI) | `uploadedImage` | durable, survives reloads |
//! | service reply (JSON) | `responseData` | tab-scoped |
//!
//! The results view reads both with [`HandoffStore::load_session`], which
//! checks presence and shape of the two slots together. Either slot missing
//! means there is no active session.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::{debug, info, warn};

use crate::data_uri::DataUri;
use crate::error::{ImageMatchError, Result};
use crate::response::SearchResponse;

/// Key for the uploaded image in the durable backend.
pub const IMAGE_KEY: &str = "uploadedImage";

/// Key for the serialized service reply in the tab-scoped backend.
pub const RESPONSE_KEY: &str = "responseData";

/// String key/value storage backing one handoff slot.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Both halves of a submitted search, as read back by the results view.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub image: DataUri,
    pub response: SearchResponse,
}

/// Two-slot handoff channel over a durable and a tab-scoped backend.
pub struct HandoffStore<D, T> {
    durable: D,
    tab: T,
}

impl HandoffStore<MemoryStore, MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), MemoryStore::new())
    }
}

impl<D: KeyValueStore, T: KeyValueStore> HandoffStore<D, T> {
    pub fn new(durable: D, tab: T) -> Self {
        Self { durable, tab }
    }

    pub fn write_image(&self, image: &DataUri) -> Result<()> {
        self.durable.set(IMAGE_KEY, image.as_str())?;
        debug!(bytes = image.as_str().len(), "Stored session image");
        Ok(())
    }

    pub fn read_image(&self) -> Result<Option<DataUri>> {
        self.durable
            .get(IMAGE_KEY)?
            .map(|raw| DataUri::parse(&raw))
            .transpose()
    }

    pub fn write_response(&self, response: &SearchResponse) -> Result<()> {
        let document = response.to_json()?;
        self.tab.set(RESPONSE_KEY, &document)?;
        debug!(results = response.len(), "Stored search response");
        Ok(())
    }

    pub fn read_response(&self) -> Result<Option<SearchResponse>> {
        self.tab
            .get(RESPONSE_KEY)?
            .map(|raw| SearchResponse::from_json(&raw))
            .transpose()
    }

    /// Write both slots for one submission: image first, then the reply.
    ///
    /// Any previous session is dropped first. If the reply cannot be stored
    /// the new image is removed again, so a failed write leaves no session
    /// rather than a new image paired with an old reply.
    pub fn write_session(&self, image: &DataUri, response: &SearchResponse) -> Result<()> {
        self.clear()?;
        self.write_image(image)?;
        if let Err(e) = self.write_response(response) {
            warn!(error = %e, "Failed to store search response, dropping session image");
            if let Err(cleanup) = self.durable.remove(IMAGE_KEY) {
                warn!(error = %cleanup, "Failed to remove session image");
            }
            return Err(e);
        }
        info!(results = response.len(), "Search session written");
        Ok(())
    }

    /// Read and validate both slots together.
    ///
    /// A missing slot is `NoActiveSession`. A slot that does not parse is
    /// `MalformedResponse`. Partial state never yields a `Session`.
    pub fn load_session(&self) -> Result<Session> {
        let raw_image = self.durable.get(IMAGE_KEY)?;
        let raw_response = self.tab.get(RESPONSE_KEY)?;

        let (raw_image, raw_response) = match (raw_image, raw_response) {
            (Some(image), Some(response)) => (image, response),
            (image, response) => {
                warn!(
                    has_image = image.is_some(),
                    has_response = response.is_some(),
                    "Incomplete search session"
                );
                return Err(ImageMatchError::NoActiveSession);
            }
        };

        let image = DataUri::parse(&raw_image)?;
        let response = SearchResponse::from_json(&raw_response)?;
        info!(results = response.len(), "Search session loaded");

        Ok(Session { image, response })
    }

    /// Drop both slots ("new search").
    pub fn clear(&self) -> Result<()> {
        self.durable.remove(IMAGE_KEY)?;
        self.tab.remove(RESPONSE_KEY)?;
        info!("Search session cleared");
        Ok(())
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    pub fn tab(&self) -> &T {
        &self.tab
    }
}
