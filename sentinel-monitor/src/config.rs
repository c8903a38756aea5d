use std::time::Duration;

/// Tick-level tuning: batch size per claim, worker pool width, channel
/// depth, and the two timeouts that bound a single probe and a whole tick.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub batch_size: u32,
    pub worker_count: usize,
    pub channel_buffer: usize,
    pub job_timeout: Duration,
    pub health_check_timeout: Duration,
    pub probe_period: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            worker_count: 128,
            channel_buffer: 1000,
            job_timeout: Duration::from_secs(120),
            health_check_timeout: Duration::from_secs(50),
            probe_period: Duration::from_secs(180),
        }
    }
}

impl MonitorConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            batch_size: std::env::var("MONITOR_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.batch_size),
            worker_count: std::env::var("MONITOR_WORKER_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.worker_count),
            channel_buffer: std::env::var("MONITOR_CHANNEL_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.channel_buffer),
            job_timeout: std::env::var("MONITOR_JOB_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.job_timeout),
            health_check_timeout: std::env::var("MONITOR_HEALTH_CHECK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.health_check_timeout),
            probe_period: std::env::var("MONITOR_PROBE_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.probe_period),
        }
    }
}
