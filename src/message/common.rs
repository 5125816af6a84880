use super::{write_encoded, write_raw};
use std::fmt;
use std::io::{self, Write};

/// Hit type marker written as `t=<type>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitType {
    Event,
    Pageview,
    Timing,
    Exception,
}

impl HitType {
    pub fn as_str(self) -> &'static str {
        match self {
            HitType::Event => "event",
            HitType::Pageview => "pageview",
            HitType::Timing => "timing",
            HitType::Exception => "exception",
        }
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Properties shared by every message type.
///
/// `data_source` (`ds`) and `application_id` (`aid`) are carried for callers
/// but not emitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Common {
    pub tracking_id: String,
    pub client_id: String,
    pub user_id: String,
    pub user_language: String,
    pub user_agent: String,
    pub data_source: String,
    pub application_id: String,
}

impl Common {
    pub fn with_tracking_id(tracking_id: impl Into<String>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            ..Default::default()
        }
    }

    /// `v=1`, the raw tracking ID when present, then the hit type.
    pub(crate) fn write_head(&self, sink: &mut dyn Write, hit_type: HitType) -> io::Result<usize> {
        sink.write_all(b"v=1")?;
        let mut n = 3;
        if !self.tracking_id.is_empty() {
            n += write_raw(sink, "tid", &self.tracking_id)?;
        }
        n += write_raw(sink, "t", hit_type.as_str())?;
        Ok(n)
    }

    /// Optional user fields, `ul` unescaped.
    pub(crate) fn write_rest(&self, sink: &mut dyn Write) -> io::Result<usize> {
        let mut n = 0;
        if !self.client_id.is_empty() {
            n += write_encoded(sink, "cid", &self.client_id)?;
        }
        if !self.user_id.is_empty() {
            n += write_encoded(sink, "uid", &self.user_id)?;
        }
        if !self.user_language.is_empty() {
            n += write_raw(sink, "ul", &self.user_language)?;
        }
        if !self.user_agent.is_empty() {
            n += write_encoded(sink, "ua", &self.user_agent)?;
        }
        Ok(n)
    }
}
