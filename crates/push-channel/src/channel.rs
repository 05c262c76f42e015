//! Browser Push Channel
//!
//! Socket.IO client over `gloo_net`'s WebSocket: answers server pings,
//! buffers emits until the namespace is connected and reconnects after a
//! drop.
//!
//! Each socket is split into a writer task fed by an unbounded queue and a
//! reader task feeding `handle_frame`. Sockets are numbered; tasks of a
//! replaced socket stand down.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::channel::mpsc::{self, UnboundedSender};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use gloo_timers::callback::Timeout;
use serde_json::Value;
use tracing::{debug, info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::codec::{self, EnginePacket, SocketPacket};

/// Fired once the server accepts the namespace connection.
pub const CONNECT_EVENT: &str = "connect";
/// Fired when an established connection is lost.
pub const DISCONNECT_EVENT: &str = "disconnect";
/// Fired when the server refuses the namespace connection.
pub const CONNECT_ERROR_EVENT: &str = "connect_error";

const RECONNECT_DELAY_MS: u32 = 2_000;

type Handler = Rc<dyn Fn(Option<Value>)>;

struct Inner {
    url: String,
    /// Number of the live socket
    generation: u64,
    /// Writer queue of the live socket; dropping it closes the socket
    outgoing: Option<UnboundedSender<String>>,
    handlers: HashMap<String, Vec<Handler>>,
    connected: bool,
    /// Event frames emitted before the namespace was connected
    outbox: Vec<String>,
    liveness_window_ms: Option<u32>,
    heartbeat: Option<Timeout>,
    reconnect: Option<Timeout>,
    /// Set by `close()`; no reconnects afterwards
    shut_down: bool,
}

/// Cloneable handle to one push connection.
#[derive(Clone)]
pub struct PushChannel {
    inner: Rc<RefCell<Inner>>,
}

impl PushChannel {
    /// Open a channel to a Socket.IO endpoint (see [`crate::socket_url`]).
    pub fn connect(url: impl Into<String>) -> Self {
        let channel = Self {
            inner: Rc::new(RefCell::new(Inner {
                url: url.into(),
                generation: 0,
                outgoing: None,
                handlers: HashMap::new(),
                connected: false,
                outbox: Vec::new(),
                liveness_window_ms: None,
                heartbeat: None,
                reconnect: None,
                shut_down: false,
            })),
        };
        channel.open_socket();
        channel
    }

    /// Register a handler for a named server event.
    pub fn on<F>(&self, event: &str, handler: F)
    where
        F: Fn(Option<Value>) + 'static,
    {
        self.inner
            .borrow_mut()
            .handlers
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Fire-and-forget event to the server.
    pub fn emit(&self, event: &str, payload: Option<Value>) {
        let frame = codec::encode_event(event, payload.as_ref());
        let connected = self.inner.borrow().connected;
        if connected {
            self.send_frame(frame);
        } else {
            debug!(event, "buffering emit until connected");
            self.inner.borrow_mut().outbox.push(frame);
        }
    }

    /// Close the socket and stop reconnecting.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.shut_down = true;
        inner.connected = false;
        inner.generation += 1;
        inner.outgoing = None;
        inner.heartbeat = None;
        inner.reconnect = None;
        inner.outbox.clear();
        info!("push channel closed");
    }

    fn from_weak(weak: &Weak<RefCell<Inner>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn is_current(&self, generation: u64) -> bool {
        let inner = self.inner.borrow();
        !inner.shut_down && inner.generation == generation
    }

    fn open_socket(&self) {
        let url = self.inner.borrow().url.clone();
        let ws = match WebSocket::open(&url) {
            Ok(ws) => ws,
            Err(err) => {
                warn!(%err, %url, "failed to open push socket");
                self.schedule_reconnect();
                return;
            }
        };
        debug!(%url, "push socket opening");

        let (mut sink, mut stream) = ws.split();
        let (tx, mut rx) = mpsc::unbounded::<String>();
        let generation = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.outgoing = Some(tx);
            inner.generation
        };

        spawn_local(async move {
            while let Some(frame) = rx.next().await {
                if let Err(err) = sink.send(Message::Text(frame)).await {
                    warn!(%err, "push send failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let weak = Rc::downgrade(&self.inner);
        spawn_local(async move {
            while let Some(message) = stream.next().await {
                let Some(channel) = Self::from_weak(&weak) else { return };
                if !channel.is_current(generation) {
                    return;
                }
                match message {
                    Ok(message) => match frame_text(message) {
                        Some(frame) => channel.handle_frame(&frame),
                        None => warn!("ignoring binary push frame"),
                    },
                    Err(err) => debug!(%err, "push socket error"),
                }
            }
            if let Some(channel) = Self::from_weak(&weak) {
                channel.handle_close(generation);
            }
        });
    }

    fn handle_frame(&self, frame: &str) {
        match codec::decode(frame) {
            Ok(EnginePacket::Open(handshake)) => {
                debug!(sid = %handshake.sid, "engine handshake");
                self.inner.borrow_mut().liveness_window_ms = Some(handshake.liveness_window_ms());
                self.send_frame(codec::CONNECT_FRAME.to_string());
                self.arm_heartbeat();
            }
            Ok(EnginePacket::Ping(body)) => {
                self.send_frame(codec::encode_pong(&body));
                self.arm_heartbeat();
            }
            Ok(EnginePacket::Close) => self.drop_socket(),
            Ok(EnginePacket::Message(packet)) => self.handle_packet(packet),
            Ok(EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop) => {}
            Err(err) => warn!(%err, frame, "dropping malformed push frame"),
        }
    }

    fn handle_packet(&self, packet: SocketPacket) {
        match packet {
            SocketPacket::Connect { data, .. } => {
                let outbox = {
                    let mut inner = self.inner.borrow_mut();
                    inner.connected = true;
                    std::mem::take(&mut inner.outbox)
                };
                info!(buffered = outbox.len(), "push channel connected");
                for frame in outbox {
                    self.send_frame(frame);
                }
                self.dispatch(CONNECT_EVENT, data);
            }
            SocketPacket::Event { name, data, .. } => self.dispatch(&name, data),
            SocketPacket::Disconnect { namespace } => {
                info!(%namespace, "server closed the namespace");
                self.inner.borrow_mut().connected = false;
                self.dispatch(DISCONNECT_EVENT, None);
            }
            SocketPacket::ConnectError { data, .. } => {
                warn!(?data, "namespace connection refused");
                self.dispatch(CONNECT_ERROR_EVENT, data);
            }
            SocketPacket::Ack { .. } => {}
        }
    }

    /// The socket of `generation` is gone: report it and plan a reconnect.
    fn handle_close(&self, generation: u64) {
        let was_connected = {
            let mut inner = self.inner.borrow_mut();
            if inner.shut_down || inner.generation != generation {
                return;
            }
            let was_connected = inner.connected;
            inner.generation += 1;
            inner.connected = false;
            inner.outgoing = None;
            inner.heartbeat = None;
            was_connected
        };
        info!(generation, "push socket closed");
        if was_connected {
            self.dispatch(DISCONNECT_EVENT, None);
        }
        self.schedule_reconnect();
    }

    /// Give up on the live socket without waiting for the browser's close.
    fn drop_socket(&self) {
        let generation = self.inner.borrow().generation;
        self.handle_close(generation);
    }

    /// Invoke handlers without holding the borrow; handlers may emit.
    fn dispatch(&self, event: &str, data: Option<Value>) {
        let handlers = self.inner.borrow().handlers.get(event).cloned().unwrap_or_default();
        if handlers.is_empty() {
            debug!(event, "no handler for push event");
        }
        for handler in handlers {
            handler(data.clone());
        }
    }

    fn send_frame(&self, frame: String) {
        let inner = self.inner.borrow();
        match &inner.outgoing {
            Some(tx) => {
                if tx.unbounded_send(frame).is_err() {
                    debug!("push writer gone, frame dropped");
                }
            }
            None => debug!(%frame, "no socket, frame dropped"),
        }
    }

    /// Restart the liveness timer; expiry drops the socket so it reconnects.
    fn arm_heartbeat(&self) {
        let Some(window_ms) = self.inner.borrow().liveness_window_ms else { return };
        let weak = Rc::downgrade(&self.inner);
        let timer = Timeout::new(window_ms, move || {
            if let Some(channel) = Self::from_weak(&weak) {
                warn!(window_ms, "no ping from server, dropping connection");
                channel.drop_socket();
            }
        });
        self.inner.borrow_mut().heartbeat = Some(timer);
    }

    fn schedule_reconnect(&self) {
        let weak = Rc::downgrade(&self.inner);
        let timer = Timeout::new(RECONNECT_DELAY_MS, move || {
            let Some(channel) = Self::from_weak(&weak) else { return };
            if !channel.inner.borrow().shut_down {
                channel.open_socket();
            }
        });
        self.inner.borrow_mut().reconnect = Some(timer);
    }
}

/// Engine.IO frames over WebSocket are text; binary attachments are unsupported.
fn frame_text(message: Message) -> Option<String> {
    match message {
        Message::Text(text) => Some(text),
        Message::Bytes(_) => None,
    }
}
