//! The client's WebSocket connection to the relay.
//!
//! [`RelayLink`] wraps one tokio-tungstenite connection and splits it into an
//! owned [`LinkSender`] / [`LinkReceiver`] pair, so the runtime can hold the
//! read half in its event loop while sending from transition handlers. The
//! connection is established once and never re-established: when the link
//! closes, the session is over, and the user reconnects by restarting the
//! client.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use spotlight_core::SyncMessage;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Errors raised by the relay link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The WebSocket handshake with the relay failed.
    #[error("failed to connect to relay at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// An outbound message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// An outbound frame could not be written to the socket.
    #[error("failed to send message: {0}")]
    Send(#[source] tokio_tungstenite::tungstenite::Error),
}

/// A live connection to the relay, ready to be split.
pub struct RelayLink {
    ws: WsStream,
}

impl RelayLink {
    /// Connects to the relay at `url` (e.g. `ws://192.168.1.10:3001`).
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Connect`] if the TCP connection or WebSocket
    /// handshake fails.
    pub async fn connect(url: &str) -> Result<Self, LinkError> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|source| LinkError::Connect {
                url: url.to_string(),
                source,
            })?;
        info!(url, "connected to relay");
        Ok(Self { ws })
    }

    /// Splits the connection into independently owned halves.
    pub fn split(self) -> (LinkSender, LinkReceiver) {
        let (sink, stream) = self.ws.split();
        (LinkSender { sink }, LinkReceiver { stream })
    }
}

/// The write half: encodes [`SyncMessage`]s and sends them as text frames.
pub struct LinkSender {
    sink: SplitSink<WsStream, WsMessage>,
}

impl LinkSender {
    /// Serializes and sends one message.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Send`] if the socket write fails, which means
    /// the link is gone.
    pub async fn send(&mut self, message: &SyncMessage) -> Result<(), LinkError> {
        let json = serde_json::to_string(message)?;
        debug!(payload = %json, "sending to relay");
        self.sink
            .send(WsMessage::Text(json))
            .await
            .map_err(LinkError::Send)
    }
}

/// The read half: yields parsed [`SyncMessage`]s from inbound text frames.
pub struct LinkReceiver {
    stream: SplitStream<WsStream>,
}

impl LinkReceiver {
    /// Receives the next message from the relay.
    ///
    /// Non-text frames are skipped, and a text frame that does not parse is
    /// logged and skipped — a misbehaving peer must not take this client
    /// down. Returns `None` once the link is closed, which is permanent.
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => match serde_json::from_str(&text) {
                    Ok(message) => return Some(message),
                    Err(e) => {
                        warn!(payload = %text, "ignoring malformed relay payload: {e}");
                    }
                },
                Ok(WsMessage::Close(_)) => {
                    info!("relay closed the connection");
                    return None;
                }
                // Ping/pong are handled by tungstenite; binary is not part
                // of this protocol.
                Ok(_) => {}
                Err(e) => {
                    warn!("relay link read error: {e}");
                    return None;
                }
            }
        }
        None
    }
}
