//! Upload transmission to the external similarity service.
//!
//! - **HTTP** - multipart `POST /api/search` over reqwest
//! - **Mock** - canned responses for tests and offline demos
//!
//! Neither implementation retries. A failed request surfaces once and the
//! submission flow stops there.

mod http;
mod mock;

pub use http::{HttpSearchClient, IMAGE_FIELD};
pub use mock::{MockSearchService, RecordedUpload};

use async_trait::async_trait;

use crate::error::Result;
use crate::response::SearchResponse;
use crate::validator::AcceptedFile;

/// Something that can answer a similarity search for an accepted file.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Send the file and return the parsed reply.
    ///
    /// Network and HTTP failures are `Transmission`. A reply without a
    /// `results` array is `MalformedResponse`.
    async fn search(&self, file: &AcceptedFile) -> Result<SearchResponse>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}
