//! HTTP transport for the shop services

mod transport;

pub use transport::ReqwestTransport;
