use std::time::Duration;

/// Tick-level tuning for the delivery worker pool plus the SQS long-poll
/// parameters used on each receive call.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub worker_count: usize,
    pub channel_buffer: usize,
    pub job_timeout: Duration,
    pub max_messages_per_receive: u32,
    pub wait_time_secs: u32,
    pub visibility_timeout_secs: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            worker_count: 128,
            channel_buffer: 1000,
            job_timeout: Duration::from_secs(120),
            max_messages_per_receive: 1,
            wait_time_secs: 10,
            visibility_timeout_secs: 30,
        }
    }
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            worker_count: std::env::var("NOTIFIER_WORKER_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.worker_count),
            channel_buffer: std::env::var("NOTIFIER_CHANNEL_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.channel_buffer),
            job_timeout: std::env::var("NOTIFIER_JOB_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.job_timeout),
            ..default
        }
    }
}
