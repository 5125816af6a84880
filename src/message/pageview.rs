use super::{Common, HitType, Message, fmt_message, write_encoded, write_raw};
use std::fmt;
use std::io::{self, Write};

/// Message of the `pageview` hit type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pageview {
    pub common: Common,
    /// Written unescaped; the host is expected to be URL-safe already.
    pub document_host: String,
    pub document_path: String,
    pub document_title: String,
}

impl Pageview {
    pub fn with_document_host(
        document_host: impl Into<String>,
        document_path: impl Into<String>,
        document_title: impl Into<String>,
    ) -> Self {
        Self {
            common: Common::default(),
            document_host: document_host.into(),
            document_path: document_path.into(),
            document_title: document_title.into(),
        }
    }

    pub fn with_common(mut self, common: Common) -> Self {
        self.common = common;
        self
    }
}

impl Message for Pageview {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize> {
        let mut n = self.common.write_head(sink, HitType::Pageview)?;
        n += self.common.write_rest(sink)?;
        n += write_raw(sink, "dh", &self.document_host)?;
        n += write_encoded(sink, "dp", &self.document_path)?;
        n += write_encoded(sink, "dt", &self.document_title)?;
        Ok(n)
    }
}

impl fmt::Display for Pageview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_message(self, f)
    }
}
