//! # afrender-fetch
//!
//! Downloads predicted structure files over HTTP.
//!
//! [`StructureFetcher`] is the seam the batch driver depends on;
//! [`HttpFetcher`] is the `ureq`-backed implementation.

pub mod error;
pub mod http;
pub mod url;

use std::path::Path;

use afrender_core::Identifier;

pub use error::FetchError;
pub use http::HttpFetcher;
pub use url::UrlTemplate;

/// Retrieve the remote artifact for `id` and store its bytes at `dest`.
pub trait StructureFetcher {
    /// Overwrites `dest`. Returns the number of bytes written.
    fn fetch(&self, id: &Identifier, dest: &Path) -> Result<u64, FetchError>;
}
