//! Queue Adapter: a durable, at-least-once channel for `IncidentEventMessage`s
//! between the Monitor Orchestrator (producer) and the Notifier Orchestrator
//! (consumer). `SqsQueue` is the production implementation; `InMemoryQueue`
//! is a test double with the same delivery semantics (messages stay
//! in-flight until explicitly deleted).

mod error;
mod in_memory;
mod sqs;

pub use error::Error;
pub use in_memory::InMemoryQueue;
pub use sqs::SqsQueue;

use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Error>;

/// An opaque receipt handle identifying one delivery of a message. Must be
/// passed back to `delete` to remove the message; a new receive of the same
/// message (after its visibility timeout expires) yields a different handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptHandle(pub String);

#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub body: String,
    pub receipt_handle: ReceiptHandle,
}

#[async_trait]
pub trait QueueAdapter: Send + Sync {
    async fn send(&self, body: &str) -> Result<()>;

    /// Long-polls for up to `max_messages`, waiting `wait_time_secs` before
    /// returning an empty batch. Received messages become invisible to
    /// other consumers for `visibility_timeout_secs`.
    async fn receive(
        &self,
        max_messages: u32,
        wait_time_secs: u32,
        visibility_timeout_secs: u32,
    ) -> Result<Vec<ReceivedMessage>>;

    async fn delete(&self, receipt_handle: &ReceiptHandle) -> Result<()>;
}
