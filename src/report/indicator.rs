// src/report/indicator.rs

//! Color-coded status indicator driven over UDP (AnyBar protocol: the
//! datagram payload is the style name).

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::UdpSocket;
use tracing::warn;

use crate::report::{BuildStatus, StatusSink};

/// Upper bound on a single indicator update.
pub const INDICATOR_DEADLINE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStyle {
    Blue,
    Orange,
    Black,
    Red,
}

impl IndicatorStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorStyle::Blue => "blue",
            IndicatorStyle::Orange => "orange",
            IndicatorStyle::Black => "black",
            IndicatorStyle::Red => "red",
        }
    }
}

/// Send `style` to the indicator listening on local `port`.
pub async fn send_indicator(port: u16, style: IndicatorStyle, deadline: Duration) -> Result<()> {
    let target = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let send = async {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.connect(target).await?;
        socket.send(style.as_str().as_bytes()).await?;
        Ok::<_, std::io::Error>(())
    };

    tokio::time::timeout(deadline, send)
        .await
        .with_context(|| format!("indicator update to {target} timed out"))?
        .with_context(|| format!("sending indicator update to {target}"))
}

/// Dispatches each update as its own task so the caller never waits on the
/// network.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSink {
    port: u16,
    deadline: Duration,
}

impl IndicatorSink {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            deadline: INDICATOR_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

impl StatusSink for IndicatorSink {
    fn publish(&self, status: &BuildStatus) {
        let style = status.indicator_style();
        let (port, deadline) = (self.port, self.deadline);
        tokio::spawn(async move {
            if let Err(e) = send_indicator(port, style, deadline).await {
                warn!(
                    port,
                    style = style.as_str(),
                    error = %format!("{e:#}"),
                    "indicator update failed"
                );
            }
        });
    }
}
