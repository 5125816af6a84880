pub mod client;
pub mod error;
pub mod stats;

pub use client::{AUTO_FLUSH_DEPTH, BUFFER_SIZE_LIMIT, BufferedClient, ErrorCallback};
pub use error::QueueError;
pub use stats::QueueStats;

use crate::message::Message;
use crate::sender::Transport;
use std::future::Future;

/// Accumulates messages and sends them on `flush` or once a limit is reached.
pub trait Buffer: Send + Sync {
    fn queue<M: Message + ?Sized>(
        &self,
        message: &M,
    ) -> impl Future<Output = Result<(), QueueError>> + Send;

    fn flush(&self) -> impl Future<Output = Result<(), QueueError>> + Send;
}

/// Sends a single message right away.
pub trait Sender: Send + Sync {
    fn send<M: Message + ?Sized>(
        &self,
        message: &M,
    ) -> impl Future<Output = Result<(), QueueError>> + Send;
}

/// Sends a group of messages, in order, as few requests as the limits allow.
pub trait BatchSender: Send + Sync {
    fn send_batch<M: Message>(
        &self,
        messages: &[M],
    ) -> impl Future<Output = Result<(), QueueError>> + Send;
}

impl<T: Transport> Buffer for BufferedClient<T> {
    async fn queue<M: Message + ?Sized>(&self, message: &M) -> Result<(), QueueError> {
        BufferedClient::queue(self, message).await
    }

    async fn flush(&self) -> Result<(), QueueError> {
        BufferedClient::flush(self).await
    }
}

impl<B: Buffer> Sender for B {
    async fn send<M: Message + ?Sized>(&self, message: &M) -> Result<(), QueueError> {
        self.queue(message).await?;
        self.flush().await
    }
}

/// Stops at the first failing message; anything queued before it is still
/// flushed by the next send or flush.
impl<B: Buffer> BatchSender for B {
    async fn send_batch<M: Message>(&self, messages: &[M]) -> Result<(), QueueError> {
        for message in messages {
            self.queue(message).await?;
        }
        self.flush().await
    }
}
