use super::error::QueueError;
use super::stats::{QueueStats, StatsCollector};
use crate::app::config::{ClientConfig, ConfigError};
use crate::message::Message;
use crate::sender::{Endpoint, HttpResponse, ReqwestTransport, Transport, TransportError};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Largest accumulated payload, in bytes, before pending messages are flushed.
pub const BUFFER_SIZE_LIMIT: usize = 16 * 1024 * 1024 - 1;

/// Queue depth that triggers an automatic flush.
pub const AUTO_FLUSH_DEPTH: usize = 20;

const BATCH_CONTENT_TYPE: &str = "text/plain";

/// Called with every transport failure, while the queue lock is held.
/// Must not call back into the client.
pub type ErrorCallback = Arc<dyn Fn(&TransportError) + Send + Sync>;

/// Serialized fragments joined by `\n`. `depth == 0` iff `buffer` is empty.
#[derive(Debug, Default)]
struct QueueState {
    buffer: Vec<u8>,
    depth: usize,
}

/// Accumulates messages and sends them on [`flush`](Self::flush), when
/// [`AUTO_FLUSH_DEPTH`] messages are queued, or when the payload would
/// outgrow [`BUFFER_SIZE_LIMIT`].
///
/// Queueing and flushing share one lock, held for the whole network
/// round-trip of a flush.
pub struct BufferedClient<T> {
    endpoint: Endpoint,
    transport: T,
    state: Mutex<QueueState>,
    depth: AtomicUsize,
    on_error: Option<ErrorCallback>,
    stats: StatsCollector,
}

impl BufferedClient<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.transport_config())?;
        Ok(Self::new(config.endpoint(), transport))
    }
}

impl<T: Transport> BufferedClient<T> {
    pub fn new(endpoint: impl Into<Endpoint>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            state: Mutex::new(QueueState::default()),
            depth: AtomicUsize::new(0),
            on_error: None,
            stats: StatsCollector::default(),
        }
    }

    pub fn with_error_callback<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&TransportError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Messages buffered but not yet sent. Read without taking the lock, so
    /// the value may be stale while other callers are queueing.
    pub fn queue_depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> QueueStats {
        self.stats.snapshot()
    }

    /// Serializes `message` into the buffer, flushing first if it would not
    /// fit and afterwards if the queue reached [`AUTO_FLUSH_DEPTH`].
    pub async fn queue<M: Message + ?Sized>(&self, message: &M) -> Result<(), QueueError> {
        if message.tracking_id().is_empty() {
            return Err(QueueError::MissingTrackingId);
        }

        let mut state = self.state.lock().await;

        loop {
            let mark = state.buffer.len();
            if state.depth > 0 {
                state.buffer.push(b'\n');
            }

            if let Err(e) = message.write_to(&mut state.buffer) {
                state.buffer.truncate(mark);
                return Err(QueueError::Serialization(e));
            }

            if state.buffer.len() <= BUFFER_SIZE_LIMIT {
                break;
            }

            if state.depth == 0 {
                // Nothing to flush ahead of it; send it on its own.
                warn!(
                    "Message of {} bytes exceeds buffer limit of {} bytes",
                    state.buffer.len(),
                    BUFFER_SIZE_LIMIT
                );
                break;
            }

            state.buffer.truncate(mark);
            debug!(
                "Buffer limit reached with {} queued messages, flushing before retry",
                state.depth
            );
            self.flush_locked(&mut state).await?;
        }

        state.depth += 1;
        self.depth.store(state.depth, Ordering::Release);
        self.stats.record_queued();

        if state.depth >= AUTO_FLUSH_DEPTH {
            debug!("Queue depth reached {}, flushing", state.depth);
            return self.flush_locked(&mut state).await;
        }
        Ok(())
    }

    /// Sends everything buffered. A no-op on an empty queue.
    pub async fn flush(&self) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        self.flush_locked(&mut state).await
    }

    /// Caller must hold the state lock. Local state is cleared before the
    /// response is looked at; nothing is re-queued.
    async fn flush_locked(&self, state: &mut QueueState) -> Result<(), QueueError> {
        let depth = state.depth;
        if depth == 0 {
            return Ok(());
        }

        let payload = std::mem::take(&mut state.buffer);
        state.depth = 0;
        self.depth.store(0, Ordering::Release);

        let (url, result) = if depth == 1 {
            let url = self
                .endpoint
                .collect_url(&String::from_utf8_lossy(&payload));
            let result = self.transport.get(&url).await;
            (url, result)
        } else {
            let url = self.endpoint.batch_url();
            debug!("Sending batch of {} messages ({} bytes)", depth, payload.len());
            let result = self
                .transport
                .post(&url, BATCH_CONTENT_TYPE, Bytes::from(payload))
                .await;
            (url, result)
        };

        self.handle_response(url, depth, result)
    }

    fn handle_response(
        &self,
        url: String,
        depth: usize,
        result: Result<HttpResponse, TransportError>,
    ) -> Result<(), QueueError> {
        match result {
            Err(err) => {
                error!("Failed to send {} messages to {}: {}", depth, self.endpoint, err);
                self.stats.record_flush(false, depth);
                if let Some(on_error) = &self.on_error {
                    on_error(&err);
                }
                Err(QueueError::Transport(err))
            }
            Ok(response) if response.is_ok() => {
                info!("Sent {} messages to {}", depth, self.endpoint);
                self.stats.record_flush(true, depth);
                Ok(())
            }
            Ok(response) => {
                warn!(
                    "Collector rejected {} messages: HTTP {}",
                    depth, response.status
                );
                self.stats.record_flush(false, depth);
                Err(QueueError::Rejected {
                    url,
                    status: response.status,
                    body: response.body,
                })
            }
        }
    }
}

impl<T> fmt::Debug for BufferedClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedClient")
            .field("endpoint", &self.endpoint)
            .field("queue_depth", &self.depth.load(Ordering::Relaxed))
            .field("has_error_callback", &self.on_error.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
