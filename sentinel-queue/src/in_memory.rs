use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{QueueAdapter, ReceiptHandle, ReceivedMessage, Result};

/// A `QueueAdapter` backed by an in-process `Vec`, for tests that want real
/// at-least-once semantics (messages only disappear once `delete` is
/// called) without a live SQS queue.
#[derive(Default)]
pub struct InMemoryQueue {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    pending: Vec<String>,
    in_flight: HashMap<String, String>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.pending.len() + inner.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl QueueAdapter for InMemoryQueue {
    async fn send(&self, body: &str) -> Result<()> {
        self.inner.lock().unwrap().pending.push(body.to_string());
        Ok(())
    }

    async fn receive(
        &self,
        max_messages: u32,
        _wait_time_secs: u32,
        _visibility_timeout_secs: u32,
    ) -> Result<Vec<ReceivedMessage>> {
        let mut inner = self.inner.lock().unwrap();
        let take = (max_messages as usize).min(inner.pending.len());
        let drained: Vec<String> = inner.pending.drain(..take).collect();
        let mut out = Vec::with_capacity(drained.len());
        for body in drained {
            let handle = Uuid::new_v4().to_string();
            inner.in_flight.insert(handle.clone(), body.clone());
            out.push(ReceivedMessage {
                body,
                receipt_handle: ReceiptHandle(handle),
            });
        }
        Ok(out)
    }

    async fn delete(&self, receipt_handle: &ReceiptHandle) -> Result<()> {
        self.inner.lock().unwrap().in_flight.remove(&receipt_handle.0);
        Ok(())
    }
}
