//! Authenticated request gateway: credential attachment, one refresh-and-retry
//! on 401, response normalization and session-expiry signalling.

mod request;
mod service;
mod transport;

#[cfg(test)]
pub(crate) mod tests;

pub use request::{path_segment, ApiRequest};
pub use service::{decode_body, RequestGateway};
pub use transport::{HttpMethod, HttpRequest, HttpTransport, RawResponse};
