//! Agent configuration

use std::time::Duration;

use anyhow::{Context, Result};

/// Configuration for the telemetry agent
///
/// Fixed for the lifetime of the process; constructed once in `main` and
/// passed into the cycle controller.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Label for the physical install point, sent with every reading
    pub location: String,
    /// Wifi network name
    pub ssid: String,
    /// Wifi passphrase
    pub password: String,
    /// Collector endpoint (host:port)
    pub collector_addr: String,
    /// Timeout for the TCP connect to the collector
    pub connect_timeout: Duration,
    /// Link-status polls before a join attempt is declared failed
    pub retry_limit: u32,
    /// Delay before each link-status poll
    pub retry_delay: Duration,
    /// Interval between cycles
    pub sample_interval: Duration,
    /// Bound on the post-send wait for the collector to close the connection
    pub close_wait_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            location: "bench".into(),
            ssid: "iot-net".into(),
            password: String::new(),
            collector_addr: "127.0.0.1:8080".into(),
            connect_timeout: Duration::from_secs(5),
            retry_limit: 10,
            retry_delay: Duration::from_secs(2),
            sample_interval: Duration::from_secs(120),
            close_wait_timeout: Duration::from_secs(10),
        }
    }
}

impl AgentConfig {
    /// Build a config from defaults plus environment overrides
    ///
    /// Overrides exist for the values that differ between bench setups;
    /// the timing constants stay compiled in.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(location) = std::env::var("SENSOR_LOCATION") {
            config.location = location;
        }
        if let Ok(ssid) = std::env::var("WIFI_SSID") {
            config.ssid = ssid;
        }
        if let Ok(password) = std::env::var("WIFI_PASSWORD") {
            config.password = password;
        }
        if let Ok(addr) = std::env::var("COLLECTOR_ADDR") {
            config.collector_addr = addr;
        }
        if let Ok(secs) = std::env::var("SAMPLE_INTERVAL_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid SAMPLE_INTERVAL_SECS: {}", secs))?;
            config.sample_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_constants() {
        let config = AgentConfig::default();
        assert_eq!(config.sample_interval, Duration::from_secs(120));
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.retry_limit, 10);
    }
}
