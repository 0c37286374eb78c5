//! Collector transport seam
//!
//! The connection-oriented transport to the collector, behind a connector
//! trait so the session logic runs against in-memory streams in tests.

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Factory for connections to the collector endpoint
#[async_trait]
pub trait CollectorConnector: Send {
    /// The stream type this connector produces
    type Stream: AsyncRead + AsyncWrite + Send + Unpin;

    /// Attempt to connect, returning a stream on success
    async fn connect(&self) -> Result<Self::Stream>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}

/// TCP connector for the fixed collector address
pub struct TcpConnector {
    address: String,
}

impl TcpConnector {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

#[async_trait]
impl CollectorConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self) -> Result<Self::Stream> {
        let stream = TcpStream::connect(&self.address).await?;
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}

/// Test connector backed by in-memory duplex streams
///
/// Each connect spawns a peer task that reads one line, records it, and
/// drops its half, which is how the real collector behaves. With
/// `hold_open` the peer keeps the connection alive instead, and with
/// `refuse` the connect itself fails.
#[cfg(test)]
pub(crate) struct MockCollector {
    pub(crate) received: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    pub(crate) connects: std::sync::Arc<std::sync::atomic::AtomicU32>,
    pub(crate) refuse: bool,
    pub(crate) hold_open: bool,
}

#[cfg(test)]
impl MockCollector {
    pub(crate) fn new() -> Self {
        Self {
            received: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
            connects: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0)),
            refuse: false,
            hold_open: false,
        }
    }

    pub(crate) fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new()
        }
    }

    pub(crate) fn holding_open() -> Self {
        Self {
            hold_open: true,
            ..Self::new()
        }
    }
}

#[cfg(test)]
#[async_trait]
impl CollectorConnector for MockCollector {
    type Stream = tokio::io::DuplexStream;

    async fn connect(&self) -> Result<Self::Stream> {
        use tokio::io::AsyncBufReadExt;

        self.connects
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.refuse {
            anyhow::bail!("connection refused");
        }

        let (client, server) = tokio::io::duplex(1024);
        let received = self.received.clone();
        let hold_open = self.hold_open;
        tokio::spawn(async move {
            let mut lines = tokio::io::BufReader::new(server).lines();
            if let Ok(Some(line)) = lines.next_line().await {
                received.lock().unwrap().push(line);
            }
            if hold_open {
                // Park without dropping the server half so the client
                // never observes a peer close.
                std::future::pending::<()>().await;
            }
        });

        Ok(client)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tcp_connector_reaches_a_listening_endpoint() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let connector = TcpConnector::new(addr.to_string());
        assert_eq!(connector.name(), "tcp");

        let (connected, accepted) = tokio::join!(connector.connect(), listener.accept());
        assert!(connected.is_ok());
        assert!(accepted.is_ok());
    }

    #[tokio::test]
    async fn tcp_connector_reports_connect_errors() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let connector = TcpConnector::new(addr.to_string());
        assert!(connector.connect().await.is_err());
    }
}
