use super::{Common, HitType, Message, fmt_message, write_encoded};
use std::fmt;
use std::io::{self, Write};

/// Message of the `exception` hit type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exception {
    pub common: Common,
    pub description: String,
    pub is_fatal: bool,
}

impl Exception {
    pub fn new(description: impl Into<String>, is_fatal: bool) -> Self {
        Self {
            common: Common::default(),
            description: description.into(),
            is_fatal,
        }
    }

    pub fn with_common(mut self, common: Common) -> Self {
        self.common = common;
        self
    }
}

impl Message for Exception {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize> {
        let mut n = self.common.write_head(sink, HitType::Exception)?;
        n += self.common.write_rest(sink)?;
        n += write_encoded(sink, "exd", &self.description)?;
        if self.is_fatal {
            sink.write_all(b"&exf=1")?;
            n += 6;
        }
        Ok(n)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_message(self, f)
    }
}
