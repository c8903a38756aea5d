use async_trait::async_trait;
use aws_sdk_sqs::Client;

use crate::{Error, QueueAdapter, ReceiptHandle, ReceivedMessage, Result};

pub struct SqsQueue {
    client: Client,
    queue_url: String,
}

impl SqsQueue {
    pub async fn from_env(queue_url: String) -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: Client::new(&config),
            queue_url,
        }
    }

    pub fn new(client: Client, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl QueueAdapter for SqsQueue {
    async fn send(&self, body: &str) -> Result<()> {
        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn receive(
        &self,
        max_messages: u32,
        wait_time_secs: u32,
        visibility_timeout_secs: u32,
    ) -> Result<Vec<ReceivedMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages as i32)
            .wait_time_seconds(wait_time_secs as i32)
            .visibility_timeout(visibility_timeout_secs as i32)
            .send()
            .await
            .map_err(|e| Error::Receive(e.to_string()))?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                let body = m.body?;
                let handle = m.receipt_handle?;
                Some(ReceivedMessage {
                    body,
                    receipt_handle: ReceiptHandle(handle),
                })
            })
            .collect();
        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &ReceiptHandle) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(&receipt_handle.0)
            .send()
            .await
            .map_err(|e| Error::Delete(e.to_string()))?;
        Ok(())
    }
}
