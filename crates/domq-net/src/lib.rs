//! domq Networking
//!
//! Request descriptors, a pluggable transport and the callback-style
//! request helper.

mod ajax;
mod request;
mod transport;
mod xhr;

pub use ajax::{ajax, spawn_ajax};
pub use request::{Method, Request};
pub use transport::{
    ClientConfig, ClientConfigBuilder, HttpTransport, Transport, TransportResponse, resolve_url,
};
pub use url::Url;
pub use xhr::{ReadyState, XmlHttpRequest};

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid state")]
    InvalidState,

    #[error("Client error: {0}")]
    Client(String),
}
