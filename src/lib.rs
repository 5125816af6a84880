// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_possible_truncation, // Millisecond durations fit in u64
    clippy::missing_errors_doc,       // Error enums are documented at the type
    clippy::module_name_repetitions,  // e.g. QueueError in buffer module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Wire keys are not code identifiers
)]

//! Client for the analytics measurement protocol.
//!
//! Messages (events, pageviews, timings, exceptions) are serialized into the
//! URL-encoded wire format and accumulated by a [`BufferedClient`], which sends
//! them to the collector either as a single `collect` request or as a `batch`.

pub mod app;
pub mod buffer;
pub mod message;
pub mod sender;

// Re-export main types for easy access
pub use app::config::ClientConfig;
pub use buffer::{
    AUTO_FLUSH_DEPTH, BUFFER_SIZE_LIMIT, BatchSender, Buffer, BufferedClient, ErrorCallback,
    QueueError, QueueStats, Sender,
};
pub use message::{Common, Event, Exception, Message, MessageError, Pageview, Timing};
pub use sender::{
    Endpoint, GA_DEBUG, GA_HTTP, GA_HTTPS, HttpResponse, ReqwestTransport, Transport,
    TransportConfig, TransportError,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
