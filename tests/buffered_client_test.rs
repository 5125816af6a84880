mod common;

use common::{RecordedRequest, RecordingTransport, Scripted, test_common, test_event};
use gamp::{
    AUTO_FLUSH_DEPTH, BUFFER_SIZE_LIMIT, BatchSender, BufferedClient, Common, Endpoint, Event,
    Message, Pageview, QueueError, Sender, Timing, TransportError,
};
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;

const BASE: &str = "http://collector.test/";

fn client() -> BufferedClient<RecordingTransport> {
    BufferedClient::new(BASE, RecordingTransport::new())
}

#[tokio::test]
async fn test_single_message_is_sent_as_collect_get() {
    let client = client();
    let event = test_event(1);

    client.queue(&event).await.unwrap();
    assert_eq!(client.queue_depth(), 1);
    assert!(client.transport().requests().is_empty());

    client.flush().await.unwrap();

    assert_eq!(client.queue_depth(), 0);
    assert_eq!(
        client.transport().requests(),
        vec![RecordedRequest::Get {
            url: format!("{BASE}collect?{event}"),
        }]
    );
}

#[tokio::test]
async fn test_multiple_messages_are_sent_as_newline_joined_batch() {
    let client = client();
    let messages: Vec<Box<dyn Message>> = vec![
        Box::new(test_event(1)),
        Box::new(
            Pageview::with_document_host("example.com", "/a b", "Home").with_common(test_common()),
        ),
        Box::new(Timing::new(Duration::from_millis(125)).with_common(test_common())),
    ];

    for message in &messages {
        client.queue(message).await.unwrap();
    }
    assert_eq!(client.queue_depth(), 3);

    client.flush().await.unwrap();

    let expected_body = messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(
        client.transport().requests(),
        vec![RecordedRequest::Post {
            url: format!("{BASE}batch"),
            content_type: "text/plain".to_string(),
            body: expected_body,
        }]
    );
    assert_eq!(client.queue_depth(), 0);
}

#[tokio::test]
async fn test_missing_tracking_id_leaves_queue_untouched() {
    let client = client();
    client.queue(&test_event(1)).await.unwrap();

    let anonymous = Event::new("category", "action", Common::default()).unwrap();
    let err = client.queue(&anonymous).await.unwrap_err();

    assert!(matches!(err, QueueError::MissingTrackingId));
    assert_eq!(client.queue_depth(), 1);

    client.flush().await.unwrap();
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fragments(), vec![test_event(1).to_string()]);
}

#[tokio::test]
async fn test_auto_flush_at_threshold() {
    let client = client();

    for n in 0..AUTO_FLUSH_DEPTH - 1 {
        client.queue(&test_event(n)).await.unwrap();
    }
    assert_eq!(client.queue_depth(), AUTO_FLUSH_DEPTH - 1);
    assert!(client.transport().requests().is_empty());

    client.queue(&test_event(99)).await.unwrap();
    assert_eq!(client.queue_depth(), 0);

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fragments().len(), AUTO_FLUSH_DEPTH);

    // The next message starts a fresh buffer.
    client.queue(&test_event(100)).await.unwrap();
    assert_eq!(client.queue_depth(), 1);
    client.flush().await.unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1],
        RecordedRequest::Get {
            url: format!("{BASE}collect?{}", test_event(100)),
        }
    );
}

#[tokio::test]
async fn test_overflow_flushes_pending_messages_first() {
    let client = client();
    let big_label = "a".repeat(9_000_000);
    let first = Event::with_label("c", "a", big_label.as_str(), test_common()).unwrap();
    let second = Event::with_label("c", "b", big_label.as_str(), test_common()).unwrap();
    assert!(first.to_string().len() + second.to_string().len() + 1 > BUFFER_SIZE_LIMIT);

    client.queue(&first).await.unwrap();
    client.queue(&second).await.unwrap();

    // The first message went out alone; the second waits in a fresh buffer.
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fragments(), vec![first.to_string()]);
    assert_eq!(client.queue_depth(), 1);

    client.flush().await.unwrap();
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].fragments(), vec![second.to_string()]);
}

#[tokio::test]
async fn test_oversized_lone_message_is_sent_as_is() {
    let client = client();
    let huge = Event::with_label("c", "a", "z".repeat(BUFFER_SIZE_LIMIT + 1), test_common())
        .unwrap();

    client.queue(&huge).await.unwrap();
    assert_eq!(client.queue_depth(), 1);
    assert!(client.transport().requests().is_empty());

    client.flush().await.unwrap();
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fragments()[0].len(), huge.to_string().len());
}

#[tokio::test]
async fn test_transport_failure_clears_state_and_notifies_callback() {
    let failures = Arc::new(AtomicUsize::new(0));
    let observed = failures.clone();
    let transport = RecordingTransport::new().then(Scripted::Fail("connection reset".to_string()));
    let client = BufferedClient::new(BASE, transport).with_error_callback(move |err| {
        assert!(matches!(err, TransportError::Timeout(_)));
        observed.fetch_add(1, Ordering::SeqCst);
    });

    client.queue(&test_event(1)).await.unwrap();
    client.queue(&test_event(2)).await.unwrap();

    let err = client.flush().await.unwrap_err();
    assert!(matches!(err, QueueError::Transport(_)));
    assert_eq!(failures.load(Ordering::SeqCst), 1);
    assert_eq!(client.queue_depth(), 0);

    // Dropped messages are not re-sent.
    client.queue(&test_event(3)).await.unwrap();
    client.flush().await.unwrap();
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].fragments(), vec![test_event(3).to_string()]);

    let stats = client.stats();
    assert_eq!(stats.messages_queued, 3);
    assert_eq!(stats.failed_flushes, 1);
    assert_eq!(stats.messages_dropped, 2);
    assert_eq!(stats.messages_sent, 1);
}

#[tokio::test]
async fn test_rejected_response_reports_url_status_and_body() {
    let failures = Arc::new(AtomicUsize::new(0));
    let observed = failures.clone();
    let transport =
        RecordingTransport::new().then(Scripted::Respond(404, "Invalid tid".to_string()));
    let client = BufferedClient::new(BASE, transport).with_error_callback(move |_| {
        observed.fetch_add(1, Ordering::SeqCst);
    });
    let event = test_event(1);

    client.queue(&event).await.unwrap();
    let err = client.flush().await.unwrap_err();

    let text = err.to_string();
    assert!(text.contains(&format!("{BASE}collect?{event}")));
    assert!(text.contains("404"));
    assert!(text.contains("Invalid tid"));
    assert!(matches!(err, QueueError::Rejected { status: 404, .. }));

    // Rejections are not transport failures.
    assert_eq!(failures.load(Ordering::SeqCst), 0);
    assert_eq!(client.queue_depth(), 0);
}

#[tokio::test]
async fn test_non_200_success_status_is_an_error() {
    let transport = RecordingTransport::new().then(Scripted::Respond(204, String::new()));
    let client = BufferedClient::new(BASE, transport);

    client.queue(&test_event(1)).await.unwrap();
    let err = client.flush().await.unwrap_err();
    assert!(matches!(err, QueueError::Rejected { status: 204, .. }));
}

/// Writes part of its fragment, then fails.
struct BrokenMessage {
    common: Common,
}

impl Message for BrokenMessage {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<usize> {
        sink.write_all(b"v=1&tid=partial")?;
        Err(io::Error::other("sink rejected write"))
    }
}

impl fmt::Display for BrokenMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("broken")
    }
}

#[tokio::test]
async fn test_serialization_failure_rolls_back_buffer() {
    let client = client();
    let good = test_event(1);
    let broken = BrokenMessage {
        common: test_common(),
    };

    client.queue(&good).await.unwrap();
    let err = client.queue(&broken).await.unwrap_err();
    assert!(matches!(err, QueueError::Serialization(_)));
    assert_eq!(client.queue_depth(), 1);

    client.flush().await.unwrap();
    assert_eq!(
        client.transport().requests(),
        vec![RecordedRequest::Get {
            url: format!("{BASE}collect?{good}"),
        }]
    );
}

#[tokio::test]
async fn test_sender_and_batch_sender() {
    let client = client();

    client.send(&test_event(1)).await.unwrap();
    assert_eq!(client.transport().requests().len(), 1);
    assert_eq!(client.queue_depth(), 0);

    let batch: Vec<Event> = (2..5).map(test_event).collect();
    client.send_batch(&batch).await.unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].fragments(),
        batch.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_default_endpoint_sentinels() {
    let secure = BufferedClient::new("", RecordingTransport::new());
    let insecure = BufferedClient::new("http", RecordingTransport::new());
    assert_eq!(secure.endpoint(), &Endpoint::Https);
    assert_eq!(insecure.endpoint(), &Endpoint::Http);

    insecure.send(&test_event(1)).await.unwrap();
    match &insecure.transport().requests()[0] {
        RecordedRequest::Get { url } => {
            assert!(url.starts_with("http://www.google-analytics.com/collect?v=1&tid=UA-TEST-1"));
        }
        other => panic!("Expected collect request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_queueing_keeps_every_message_intact() {
    const TASKS: usize = 8;
    const PER_TASK: usize = 25;

    let client = Arc::new(client());
    let mut join_set = JoinSet::new();

    for task in 0..TASKS {
        let client = client.clone();
        join_set.spawn(async move {
            for n in 0..PER_TASK {
                client.queue(&test_event(task * 1000 + n)).await.unwrap();
            }
        });
    }
    while let Some(result) = join_set.join_next().await {
        result.unwrap();
    }
    client.flush().await.unwrap();

    let mut seen = HashSet::new();
    for request in client.transport().requests() {
        let fragments = request.fragments();
        assert!(fragments.len() <= AUTO_FLUSH_DEPTH);
        for fragment in fragments {
            assert!(fragment.starts_with("v=1&tid=UA-TEST-1&t=event"));
            assert!(seen.insert(fragment), "fragment sent twice");
        }
    }

    assert_eq!(seen.len(), TASKS * PER_TASK);
    assert_eq!(client.queue_depth(), 0);
    assert_eq!(client.stats().messages_sent, (TASKS * PER_TASK) as u64);
}
