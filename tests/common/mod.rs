#![allow(dead_code)]

use bytes::Bytes;
use gamp::{Common, Event, HttpResponse, Transport, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Get {
        url: String,
    },
    Post {
        url: String,
        content_type: String,
        body: String,
    },
}

impl RecordedRequest {
    /// Serialized messages carried by the request.
    pub fn fragments(&self) -> Vec<String> {
        match self {
            RecordedRequest::Get { url } => {
                let (_, query) = url.split_once("collect?").expect("collect url");
                vec![query.to_string()]
            }
            RecordedRequest::Post { body, .. } => body.split('\n').map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(u16, String),
    Fail(String),
}

/// In-memory transport that records every request and replays scripted
/// outcomes, answering 200 once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: Scripted) -> Self {
        self.script.lock().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn next_outcome(&self) -> Result<HttpResponse, TransportError> {
        match self.script.lock().pop_front() {
            Some(Scripted::Respond(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Scripted::Fail(reason)) => Err(TransportError::Timeout(reason)),
            None => Ok(HttpResponse::new(200, "")),
        }
    }
}

impl Transport for RecordingTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(RecordedRequest::Get {
            url: url.to_string(),
        });
        self.next_outcome()
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(RecordedRequest::Post {
            url: url.to_string(),
            content_type: content_type.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        self.next_outcome()
    }
}

pub fn test_common() -> Common {
    Common {
        tracking_id: "UA-TEST-1".to_string(),
        client_id: "bd4e1566-9626-4bf8-8f03-e54aa678c23f".to_string(),
        ..Default::default()
    }
}

pub fn test_event(n: usize) -> Event {
    Event::with_label("category", "action", format!("label-{n}"), test_common())
        .expect("valid event")
}
