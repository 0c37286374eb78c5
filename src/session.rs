//! Network session state machine
//!
//! Owns the wifi seam, the collector connector and the status indicator,
//! and walks `Idle -> Joining -> Joined -> Connecting -> Sending ->
//! Closing -> Idle` once per cycle. Every failure is terminal for the
//! current cycle only; `leave` always returns the machine to `Idle`.

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::indicator::{StatusColor, StatusIndicator};
use crate::transport::CollectorConnector;
use crate::wifi::WifiInterface;

/// Session failures, each terminal for the current cycle
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("wifi join failed after {attempts} attempts")]
    Join { attempts: u32 },
    #[error("collector connect failed: {reason}")]
    Connect { reason: String },
    #[error("transmit failed: {reason}")]
    Transmit { reason: String },
}

/// Where the session currently is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Joining,
    Joined,
    Connecting,
    Sending,
    Closing,
}

pub struct NetworkSession<W, C, I> {
    config: AgentConfig,
    wifi: W,
    connector: C,
    indicator: I,
    state: SessionState,
}

impl<W, C, I> NetworkSession<W, C, I>
where
    W: WifiInterface,
    C: CollectorConnector,
    I: StatusIndicator,
{
    pub fn new(config: AgentConfig, wifi: W, connector: C, indicator: I) -> Self {
        Self {
            config,
            wifi,
            connector,
            indicator,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The radio's station address, for device-id derivation
    pub fn hardware_address(&self) -> [u8; 6] {
        self.wifi.hardware_address()
    }

    /// Establish the wifi association
    ///
    /// Requests the join once, then polls link status up to `retry_limit`
    /// times with `retry_delay` before each poll. The first observed
    /// "up" wins; exhaustion fails the cycle.
    pub async fn join(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Joining;
        self.indicator.show(StatusColor::Yellow);

        self.wifi
            .start_join(&self.config.ssid, &self.config.password)
            .await;

        for attempt in 1..=self.config.retry_limit {
            sleep(self.config.retry_delay).await;
            if self.wifi.link_up().await {
                debug!(attempt, "wifi association established");
                self.state = SessionState::Joined;
                self.indicator.show(StatusColor::Green);
                return Ok(());
            }
            debug!(attempt, "wifi link not up yet");
        }

        self.state = SessionState::Idle;
        self.indicator.show(StatusColor::Red);
        Err(SessionError::Join {
            attempts: self.config.retry_limit,
        })
    }

    /// Deliver one encoded reading to the collector
    ///
    /// Connects under `connect_timeout`, writes the payload plus a line
    /// terminator, then waits for the collector to close its end. The
    /// close wait is bounded by `close_wait_timeout`; expiry counts as a
    /// transmit failure. No retry within the cycle.
    pub async fn send(&mut self, payload: &[u8]) -> Result<(), SessionError> {
        self.state = SessionState::Connecting;

        let connected = timeout(self.config.connect_timeout, self.connector.connect()).await;
        let mut stream = match connected {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(self.fail_send(SessionError::Connect {
                    reason: err.to_string(),
                }));
            }
            Err(_) => {
                return Err(self.fail_send(SessionError::Connect {
                    reason: format!(
                        "no connection within {:?}",
                        self.config.connect_timeout
                    ),
                }));
            }
        };
        debug!(transport = self.connector.name(), "connected to collector");

        self.state = SessionState::Sending;
        if let Err(err) = write_record(&mut stream, payload).await {
            return Err(self.fail_send(SessionError::Transmit {
                reason: err.to_string(),
            }));
        }

        self.state = SessionState::Closing;
        let closed = timeout(self.config.close_wait_timeout, wait_for_close(&mut stream)).await;
        match closed {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                return Err(self.fail_send(SessionError::Transmit {
                    reason: format!("error awaiting collector close: {}", err),
                }));
            }
            Err(_) => {
                return Err(self.fail_send(SessionError::Transmit {
                    reason: format!(
                        "collector did not close within {:?}",
                        self.config.close_wait_timeout
                    ),
                }));
            }
        }

        let _ = stream.shutdown().await;
        self.state = SessionState::Joined;
        Ok(())
    }

    /// Release the association unconditionally
    ///
    /// Idempotent; runs on every exit path of a cycle, whether or not the
    /// transmit succeeded, and leaves the pixel unlit.
    pub async fn leave(&mut self) {
        self.wifi.leave().await;
        self.indicator.off();
        self.state = SessionState::Idle;
    }

    fn fail_send(&mut self, err: SessionError) -> SessionError {
        warn!(%err, "send failed");
        self.indicator.show(StatusColor::Magenta);
        // The association itself is still up; leave() drops it.
        self.state = SessionState::Joined;
        err
    }
}

async fn write_record<S: AsyncWriteExt + Unpin>(stream: &mut S, payload: &[u8]) -> std::io::Result<()> {
    stream.write_all(payload).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await?;
    Ok(())
}

/// Block until the peer closes the connection
async fn wait_for_close<S: AsyncReadExt + Unpin>(stream: &mut S) -> std::io::Result<()> {
    let mut buf = [0u8; 64];
    loop {
        if stream.read(&mut buf).await? == 0 {
            return Ok(());
        }
    }
}
