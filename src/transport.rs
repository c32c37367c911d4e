//! HTTP transport bound to one base URL and bearer credential.

mod http;

pub use http::{HttpTransport, TransportError};
