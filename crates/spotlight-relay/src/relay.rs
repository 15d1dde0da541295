//! The broadcast relay: accept loop, per-link tasks, and fan-out.
//!
//! Each accepted WebSocket connection becomes a *link* with two tasks:
//!
//! - a **reader** that owns the inbound half, validates each text frame as a
//!   [`SyncMessage`], and fans the original payload out to the other links;
//! - a **writer** that drains the link's bounded outbound queue into the
//!   WebSocket sink.
//!
//! The queue between them is what keeps one slow or misbehaving peer from
//! stalling delivery to others: fan-out uses a non-blocking `try_send`, and
//! a receiver whose queue is full is simply skipped for that message.
//! Delivery is best-effort by design — there is no ack, no retry, and no
//! replay for late joiners. Messages from a single sender reach any given
//! receiver in send order (one reader loop feeding per-receiver FIFO
//! queues); nothing is guaranteed across different senders.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::Message as WsMessage,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use spotlight_core::SyncMessage;

use crate::config::RelayConfig;

/// Depth of each link's outbound queue. Deep enough to absorb a scheduling
/// hiccup at the design publish rate, shallow enough that a stuck peer is
/// skipped within a fraction of a second of traffic.
const OUTBOUND_QUEUE_DEPTH: usize = 32;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors raised when starting the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The listener could not be bound (port in use, no permission, ...).
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

// ── Connection set ────────────────────────────────────────────────────────────

/// Write handle for one connected link: the sending end of its outbound queue.
struct PeerHandle {
    outbound: mpsc::Sender<String>,
}

/// The set of currently-open links. The only state the relay holds.
///
/// Entries are added on connect and removed when the link's reader observes
/// close or error; a link found closed *during* fan-out is merely skipped,
/// since removal is driven by its own close event.
type ConnectionSet = Arc<RwLock<HashMap<Uuid, PeerHandle>>>;

// ── Relay ─────────────────────────────────────────────────────────────────────

/// A bound-but-not-yet-running relay.
///
/// Binding and running are separate steps so callers (tests in particular)
/// can bind port 0 and read back the ephemeral address before starting the
/// accept loop.
pub struct Relay {
    listener: TcpListener,
    local_addr: SocketAddr,
    peers: ConnectionSet,
}

impl Relay {
    /// Binds the relay's TCP listener.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::BindFailed`] if the address cannot be bound.
    pub async fn bind(config: &RelayConfig) -> Result<Self, RelayError> {
        let listener =
            TcpListener::bind(config.bind_addr)
                .await
                .map_err(|source| RelayError::BindFailed {
                    addr: config.bind_addr,
                    source,
                })?;
        let local_addr = listener.local_addr().map_err(|source| RelayError::BindFailed {
            addr: config.bind_addr,
            source,
        })?;

        Ok(Self {
            listener,
            local_addr,
            peers: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop until `running` is cleared.
    ///
    /// Each accepted connection is handed to its own Tokio task immediately,
    /// so the accept loop is never delayed by a single link's handshake or
    /// traffic. A short timeout on `accept()` lets the loop poll the
    /// shutdown flag even when no one is connecting.
    pub async fn run(self, running: Arc<AtomicBool>) {
        info!("relay listening on {}", self.local_addr);

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            match timeout(Duration::from_millis(200), self.listener.accept()).await {
                Ok(Ok((stream, peer_addr))) => {
                    let peers = Arc::clone(&self.peers);
                    tokio::spawn(async move {
                        handle_link(stream, peer_addr, peers).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient accept error; keep serving the other links.
                    warn!("accept error: {e}");
                }
                Err(_) => {
                    // Timeout — loop back to check the running flag.
                }
            }
        }
    }
}

// ── Per-link handling ─────────────────────────────────────────────────────────

/// Outer wrapper for one link's lifetime: runs the link and logs the outcome.
async fn handle_link(raw_stream: TcpStream, peer_addr: SocketAddr, peers: ConnectionSet) {
    match run_link(raw_stream, peer_addr, peers).await {
        Ok(()) => info!("link {peer_addr} closed"),
        Err(e) => warn!("link {peer_addr} closed with error: {e:#}"),
    }
}

/// The complete lifecycle of one link: handshake, registration, reader loop,
/// and removal from the connection set.
async fn run_link(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    peers: ConnectionSet,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let link_id = Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Register before reading so this link can receive broadcasts that
    // arrive while its first inbound frame is still in flight.
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_DEPTH);
    peers.write().await.insert(
        link_id,
        PeerHandle {
            outbound: outbound_tx,
        },
    );
    info!("link {link_id} connected from {peer_addr}");

    // Writer task: drain this link's queue into the WebSocket sink. Only
    // this task ever touches the sink, so no lock is needed.
    let writer_task = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if ws_tx.send(WsMessage::Text(payload)).await.is_err() {
                debug!("link {link_id}: send failed (peer gone)");
                break;
            }
        }
    });

    // Reader loop: validate and fan out each inbound text frame.
    while let Some(frame) = ws_rx.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                debug!("link {link_id}: read error: {e}");
                break;
            }
        };

        match frame {
            WsMessage::Text(payload) => {
                // Parse to validate, then forward the *original* payload
                // verbatim — the relay never rewrites or reorders fields.
                match serde_json::from_str::<SyncMessage>(&payload) {
                    Ok(_) => {
                        debug!("link {link_id}: relaying {} bytes", payload.len());
                        broadcast(&peers, link_id, &payload).await;
                    }
                    Err(e) => {
                        // Fire-and-forget: the sender gets no error feedback.
                        warn!("link {link_id}: dropping malformed payload: {e}");
                    }
                }
            }
            WsMessage::Binary(_) => {
                warn!("link {link_id}: unexpected binary frame (ignored)");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => {
                // Protocol-level keepalive; tungstenite answers pings itself.
            }
            WsMessage::Close(_) => {
                debug!("link {link_id}: close frame received");
                break;
            }
            WsMessage::Frame(_) => {
                debug!("link {link_id}: raw frame (ignored)");
            }
        }
    }

    // Close or error is the only way connection state is reclaimed.
    peers.write().await.remove(&link_id);
    writer_task.abort();
    info!("link {link_id} removed from connection set");
    Ok(())
}

/// Fans `payload` out to every open link except the sender.
///
/// Non-blocking per receiver: a link whose outbound queue is full loses this
/// message (best-effort delivery), and a link that closed mid-iteration is
/// skipped — its own close event removes it from the set.
async fn broadcast(peers: &ConnectionSet, sender: Uuid, payload: &str) {
    let peers = peers.read().await;
    for (link_id, handle) in peers.iter() {
        if *link_id == sender {
            continue;
        }
        match handle.outbound.try_send(payload.to_string()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("link {link_id}: outbound queue full; message skipped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("link {link_id}: closed during fan-out; skipped");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a connection set with `n` registered links and returns the
    /// matching receivers, keyed in insertion order.
    async fn set_with_links(n: usize) -> (ConnectionSet, Vec<(Uuid, mpsc::Receiver<String>)>) {
        let peers: ConnectionSet = Arc::new(RwLock::new(HashMap::new()));
        let mut receivers = Vec::new();
        for _ in 0..n {
            let id = Uuid::new_v4();
            let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);
            peers.write().await.insert(id, PeerHandle { outbound: tx });
            receivers.push((id, rx));
        }
        (peers, receivers)
    }

    #[tokio::test]
    async fn test_broadcast_excludes_the_sender() {
        let (peers, mut links) = set_with_links(3).await;
        let sender_id = links[0].0;

        broadcast(&peers, sender_id, r#"{"x":1.0,"y":2.0}"#).await;

        // Sender's queue must be empty; both others must have the payload.
        assert!(links[0].1.try_recv().is_err());
        assert_eq!(links[1].1.try_recv().unwrap(), r#"{"x":1.0,"y":2.0}"#);
        assert_eq!(links[2].1.try_recv().unwrap(), r#"{"x":1.0,"y":2.0}"#);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_set_is_a_no_op() {
        let (peers, _links) = set_with_links(1).await;
        let only_link = _links[0].0;
        broadcast(&peers, only_link, "{}").await;
        // Nothing to assert beyond "did not hang or panic".
    }

    #[tokio::test]
    async fn test_full_queue_skips_receiver_without_blocking() {
        let (peers, mut links) = set_with_links(2).await;
        let sender_id = links[0].0;

        // Saturate the receiver's queue.
        for i in 0..OUTBOUND_QUEUE_DEPTH + 5 {
            broadcast(&peers, sender_id, &format!(r#"{{"x":{i}.0,"y":0.0}}"#)).await;
        }

        // Exactly the queue depth made it through; the overflow was skipped.
        let mut delivered = 0;
        while links[1].1.try_recv().is_ok() {
            delivered += 1;
        }
        assert_eq!(delivered, OUTBOUND_QUEUE_DEPTH);
    }

    #[tokio::test]
    async fn test_closed_receiver_is_skipped_not_fatal() {
        let (peers, mut links) = set_with_links(3).await;
        let sender_id = links[0].0;

        // Simulate a link whose writer died but whose close event has not
        // yet pruned it from the set.
        links[1].1.close();

        broadcast(&peers, sender_id, r#"{"showPointer":true}"#).await;

        // The healthy link still receives the message.
        assert_eq!(links[2].1.try_recv().unwrap(), r#"{"showPointer":true}"#);
    }

    #[tokio::test]
    async fn test_per_sender_fifo_order_is_preserved() {
        let (peers, mut links) = set_with_links(2).await;
        let sender_id = links[0].0;

        for i in 0..5 {
            broadcast(&peers, sender_id, &format!(r#"{{"x":{i}.0,"y":0.0}}"#)).await;
        }

        for i in 0..5 {
            let payload = links[1].1.try_recv().unwrap();
            assert_eq!(payload, format!(r#"{{"x":{i}.0,"y":0.0}}"#));
        }
    }

    #[tokio::test]
    async fn test_bind_on_ephemeral_port_reports_real_address() {
        let config = RelayConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
        };
        let relay = Relay::bind(&config).await.unwrap();
        assert_ne!(relay.local_addr().port(), 0);
    }
}
