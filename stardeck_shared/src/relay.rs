//! Relay connection.
//!
//! The real-time channel to the session relay: length-prefixed JSON frames
//! over TCP. Connection establishment, delivery, and disconnect detection
//! live here; the scene itself only ever sees already-decoded events.

use std::net::SocketAddr;

use anyhow::Context;
use bytes::{BufMut, BytesMut};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time,
};
use tracing::info;

/// Bidirectional event channel with 4-byte big-endian length framing.
#[derive(Debug)]
pub struct RelayConn {
    stream: TcpStream,
}

impl RelayConn {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Connects to a relay endpoint.
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        info!(relay = %addr, "Connecting to relay");
        let stream = TcpStream::connect(addr).await.context("tcp connect")?;
        Ok(Self::new(stream))
    }

    pub async fn send<T: Serialize>(&mut self, ev: &T) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(ev).context("serialize event")?;
        let mut buf = BytesMut::with_capacity(4 + payload.len());
        buf.put_u32(payload.len() as u32);
        buf.extend_from_slice(&payload);
        self.stream.write_all(&buf).await.context("tcp write")?;
        Ok(())
    }

    pub async fn recv<T: DeserializeOwned>(&mut self) -> anyhow::Result<T> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .context("tcp read len")?;
        let len = u32::from_be_bytes(len_buf) as usize;
        let mut payload = vec![0u8; len];
        self.stream
            .read_exact(&mut payload)
            .await
            .context("tcp read payload")?;
        serde_json::from_slice(&payload).context("deserialize event")
    }

    /// Receives an event within the given timeout.
    pub async fn recv_timeout<T: DeserializeOwned>(
        &mut self,
        timeout: std::time::Duration,
    ) -> anyhow::Result<Option<T>> {
        match time::timeout(timeout, self.recv()).await {
            Ok(Ok(ev)) => Ok(Some(ev)),
            Ok(Err(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }

    pub fn peer_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Shuts the session down; pending deliveries are dropped.
    pub async fn disconnect(mut self) -> anyhow::Result<()> {
        self.stream.shutdown().await.context("tcp shutdown")?;
        Ok(())
    }
}

/// Accepting side of the channel, used by tests to play the relay.
pub struct RelayListener {
    listener: TcpListener,
}

impl RelayListener {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await.context("tcp bind")?;
        Ok(Self { listener })
    }

    pub async fn accept(&self) -> anyhow::Result<(RelayConn, SocketAddr)> {
        let (stream, addr) = self.listener.accept().await.context("tcp accept")?;
        Ok((RelayConn::new(stream), addr))
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}
