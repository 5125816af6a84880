use super::{Common, HitType, Message, fmt_message, write_number};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Message of the `timing` hit type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timing {
    pub common: Common,
    /// Whole milliseconds, sent as `srt`.
    pub server_response_time: Option<u64>,
}

impl Timing {
    /// Sub-millisecond precision is truncated.
    pub fn new(server_response_time: Duration) -> Self {
        Self {
            common: Common::default(),
            server_response_time: Some(server_response_time.as_millis() as u64),
        }
    }

    pub fn with_common(mut self, common: Common) -> Self {
        self.common = common;
        self
    }
}

impl Message for Timing {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize> {
        let mut n = self.common.write_head(sink, HitType::Timing)?;
        n += self.common.write_rest(sink)?;
        n += write_number(sink, "srt", self.server_response_time)?;
        Ok(n)
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_message(self, f)
    }
}
