pub mod client;
pub mod endpoint;
pub mod transport;

pub use client::{ReqwestTransport, TransportConfig};
pub use endpoint::{Endpoint, GA_DEBUG, GA_HOST, GA_HTTP, GA_HTTPS};
pub use transport::{HttpResponse, Transport, TransportError};
