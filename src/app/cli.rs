use super::config::LogLevel;
use crate::message::{Common, Event, Exception, Message, MessageError, Pageview, Timing};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Send a single measurement protocol hit.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Collector base URL, or "https" / "http" for the default collector
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Tracking ID of the destination property
    #[arg(long, env = "GAMP_TRACKING_ID")]
    pub tracking_id: String,

    /// Anonymous client ID
    #[arg(long, env = "GAMP_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(long)]
    pub user_language: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Configuration file path (optional)
    #[arg(long, env = "GAMP_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event {
        #[arg(long)]
        category: String,
        #[arg(long)]
        action: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        value: Option<u64>,
    },
    Pageview {
        #[arg(long)]
        host: String,
        #[arg(long)]
        path: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    Timing {
        /// Server response time in milliseconds
        #[arg(long)]
        server_response_ms: u64,
    },
    Exception {
        #[arg(long)]
        description: String,
        #[arg(long)]
        fatal: bool,
    },
}

impl Cli {
    pub fn common(&self) -> Common {
        Common {
            tracking_id: self.tracking_id.clone(),
            client_id: self.client_id.clone().unwrap_or_default(),
            user_id: self.user_id.clone().unwrap_or_default(),
            user_language: self.user_language.clone().unwrap_or_default(),
            user_agent: self.user_agent.clone().unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn build_message(&self) -> Result<Box<dyn Message>, MessageError> {
        let common = self.common();
        let message: Box<dyn Message> = match &self.command {
            Command::Event {
                category,
                action,
                label,
                value,
            } => {
                let mut event = Event::with_label(
                    category.as_str(),
                    action.as_str(),
                    label.as_deref().unwrap_or_default(),
                    common,
                )?;
                event.value = *value;
                Box::new(event)
            }
            Command::Pageview { host, path, title } => Box::new(
                Pageview::with_document_host(host.as_str(), path.as_str(), title.as_str())
                    .with_common(common),
            ),
            Command::Timing { server_response_ms } => Box::new(
                Timing::new(Duration::from_millis(*server_response_ms)).with_common(common),
            ),
            Command::Exception { description, fatal } => {
                Box::new(Exception::new(description.as_str(), *fatal).with_common(common))
            }
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_command() {
        let cli = Cli::try_parse_from([
            "gamp",
            "--tracking-id",
            "UA-1",
            "--client-id",
            "c1",
            "event",
            "--category",
            "cli",
            "--action",
            "run",
            "--value",
            "3",
        ])
        .unwrap();

        let message = cli.build_message().unwrap();
        assert_eq!(
            message.to_string(),
            "v=1&tid=UA-1&t=event&cid=c1&ec=cli&ea=run&ev=3"
        );
    }

    #[test]
    fn test_event_without_category_is_rejected() {
        let cli = Cli::try_parse_from([
            "gamp",
            "--tracking-id",
            "UA-1",
            "event",
            "--category",
            "",
            "--action",
            "run",
        ])
        .unwrap();
        assert_eq!(
            cli.build_message().err().unwrap(),
            MessageError::MissingParameter("Category")
        );
    }

    #[test]
    fn test_parse_exception_command() {
        let cli = Cli::try_parse_from([
            "gamp",
            "--tracking-id",
            "UA-1",
            "--log-level",
            "debug",
            "exception",
            "--description",
            "crash",
            "--fatal",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(
            cli.build_message().unwrap().to_string(),
            "v=1&tid=UA-1&t=exception&exd=crash&exf=1"
        );
    }
}
