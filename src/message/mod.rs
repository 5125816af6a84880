//! Measurement protocol messages and their wire serialization.
//!
//! Every message renders as a query-string fragment:
//! `v=1[&tid=..]&t=<type>[&cid=..][&uid=..][&ul=..][&ua=..]<type fields>`.
//! Optional fields that are empty (or zero) are left out entirely.

mod common;
mod event;
mod exception;
mod pageview;
mod timing;

use std::fmt;
use std::io::{self, Write};
use thiserror::Error;
use url::form_urlencoded;

pub use common::{Common, HitType};
pub use event::Event;
pub use exception::Exception;
pub use pageview::Pageview;
pub use timing::Timing;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// A message that can be queued for the collector.
pub trait Message: fmt::Display + Send + Sync {
    fn common(&self) -> &Common;

    fn common_mut(&mut self) -> &mut Common;

    /// Appends the URL-encoded fragment to `sink` and returns the number of
    /// bytes written. The fragment never carries a leading or trailing separator.
    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize>;

    /// An empty tracking ID makes the message invalid for queueing.
    fn tracking_id(&self) -> &str {
        &self.common().tracking_id
    }

    fn set_tracking_id(&mut self, tracking_id: String) {
        self.common_mut().tracking_id = tracking_id;
    }
}

impl<M: Message + ?Sized> Message for Box<M> {
    fn common(&self) -> &Common {
        (**self).common()
    }

    fn common_mut(&mut self) -> &mut Common {
        (**self).common_mut()
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize> {
        (**self).write_to(sink)
    }
}

/// Shared `Display` body: serialize into memory and emit as text.
pub(crate) fn fmt_message<M: Message + ?Sized>(
    message: &M,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let mut buffer = Vec::new();
    message.write_to(&mut buffer).map_err(|_| fmt::Error)?;
    f.write_str(&String::from_utf8_lossy(&buffer))
}

/// Writes `&key=value` with the value taken verbatim.
pub(crate) fn write_raw(sink: &mut dyn Write, key: &str, value: &str) -> io::Result<usize> {
    let field = format!("&{key}={value}");
    sink.write_all(field.as_bytes())?;
    Ok(field.len())
}

/// Writes `&key=value` with the value query-escaped (space becomes `+`).
pub(crate) fn write_encoded(sink: &mut dyn Write, key: &str, value: &str) -> io::Result<usize> {
    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    write_raw(sink, key, &encoded)
}

/// Numeric fields are omitted when unset or zero.
pub(crate) fn write_number(
    sink: &mut dyn Write,
    key: &str,
    value: Option<u64>,
) -> io::Result<usize> {
    match value {
        Some(value) if value != 0 => write_raw(sink, key, &value.to_string()),
        _ => Ok(0),
    }
}
