//! Province and territory boundaries for the tradeboard choropleth.
//!
//! - [`BoundaryLoader`] downloads the Natural Earth admin-1 GeoJSON with retry
//!   and mirrors it to disk for offline runs
//! - [`HttpClient`] abstracts the transport so tests never touch the network

pub mod boundary;
pub mod error;
pub mod http_client;
pub mod retry;

pub use boundary::{BoundaryLoader, BoundaryOrigin, BoundarySource, LoadedBoundaries};
pub use error::GeoError;
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use retry::{Backoff, RetryPolicy};
