//! API Layer
//!
//! One operation per REST endpoint over a pluggable [`Transport`].
//! Every response is classified into success or an [`ApiError`].

mod client;
mod error;
mod transport;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult, TransportError, FALLBACK_MESSAGE};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};
