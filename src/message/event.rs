use super::{
    Common, HitType, Message, MessageError, fmt_message, write_encoded, write_number,
};
use std::fmt;
use std::io::{self, Write};

/// Message of the `event` hit type. Category and action are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub common: Common,
    pub category: String,
    pub action: String,
    pub label: String,
    pub value: Option<u64>,
}

impl Event {
    pub fn new(
        category: impl Into<String>,
        action: impl Into<String>,
        common: Common,
    ) -> Result<Self, MessageError> {
        Self::with_label(category, action, "", common)
    }

    pub fn with_label(
        category: impl Into<String>,
        action: impl Into<String>,
        label: impl Into<String>,
        common: Common,
    ) -> Result<Self, MessageError> {
        let event = Self {
            common,
            category: category.into(),
            action: action.into(),
            label: label.into(),
            value: None,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), MessageError> {
        if self.category.is_empty() {
            return Err(MessageError::MissingParameter("Category"));
        }
        if self.action.is_empty() {
            return Err(MessageError::MissingParameter("Action"));
        }
        Ok(())
    }
}

impl Message for Event {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize> {
        let mut n = self.common.write_head(sink, HitType::Event)?;
        n += self.common.write_rest(sink)?;
        n += write_encoded(sink, "ec", &self.category)?;
        n += write_encoded(sink, "ea", &self.action)?;
        n += write_number(sink, "ev", self.value)?;
        if !self.label.is_empty() {
            n += write_encoded(sink, "el", &self.label)?;
        }
        Ok(n)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_message(self, f)
    }
}
