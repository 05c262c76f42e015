//! Socket.IO Frame Codec
//!
//! Text frames of Engine.IO v4 with Socket.IO v4 packets inside messages.
//! A frame is one packet-type digit followed by its body:
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,"pingTimeout":20000}   open
//! 2                                                        ping
//! 40                                                       connect "/"
//! 42["auction_update",{"items":[]}]                        event
//! 42/admin,7["bid_result",{..}]                            event with namespace and ack id
//! ```

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Namespace connect request for the default namespace.
pub const CONNECT_FRAME: &str = "40";

const DEFAULT_NAMESPACE: &str = "/";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine packet type `{0}`")]
    UnknownEngineType(char),
    #[error("unknown socket packet type `{0}`")]
    UnknownSocketType(char),
    #[error("binary packets are not supported")]
    Binary,
    #[error("invalid json: {0}")]
    Json(String),
    #[error("event payload is not a [name, ...] array")]
    BadEvent,
    #[error("ack id `{0}` out of range")]
    AckId(String),
}

/// Engine.IO open handshake
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings
    pub ping_interval: u32,
    /// Milliseconds the server waits for a pong
    pub ping_timeout: u32,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// How long the connection may stay silent before it counts as dead.
    pub fn liveness_window_ms(&self) -> u32 {
        self.ping_interval.saturating_add(self.ping_timeout)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        /// First argument after the event name, if any
        data: Option<Value>,
    },
    Ack {
        namespace: String,
        ack_id: Option<u64>,
        data: Option<Value>,
    },
    ConnectError {
        namespace: String,
        data: Option<Value>,
    },
}

// ========================
// Decoding
// ========================

pub fn decode(frame: &str) -> Result<EnginePacket, CodecError> {
    let (kind, body) = split_kind(frame)?;
    match kind {
        '0' => serde_json::from_str(body)
            .map(EnginePacket::Open)
            .map_err(|e| CodecError::Json(e.to_string())),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(body.to_string())),
        '3' => Ok(EnginePacket::Pong(body.to_string())),
        '4' => decode_socket(body).map(EnginePacket::Message),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(CodecError::UnknownEngineType(other)),
    }
}

fn decode_socket(body: &str) -> Result<SocketPacket, CodecError> {
    let (kind, rest) = split_kind(body)?;
    if matches!(kind, '5' | '6') {
        return Err(CodecError::Binary);
    }

    let (namespace, rest) = split_namespace(rest);

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    let ack_id = match &rest[..digits] {
        "" => None,
        id => Some(id.parse::<u64>().map_err(|_| CodecError::AckId(id.to_string()))?),
    };
    let rest = &rest[digits..];

    let data = if rest.is_empty() {
        None
    } else {
        Some(serde_json::from_str::<Value>(rest).map_err(|e| CodecError::Json(e.to_string()))?)
    };

    match kind {
        '0' => Ok(SocketPacket::Connect { namespace, data }),
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => {
            let (name, data) = split_event(data)?;
            Ok(SocketPacket::Event { namespace, ack_id, name, data })
        }
        '3' => Ok(SocketPacket::Ack { namespace, ack_id, data }),
        '4' => Ok(SocketPacket::ConnectError { namespace, data }),
        other => Err(CodecError::UnknownSocketType(other)),
    }
}

fn split_kind(frame: &str) -> Result<(char, &str), CodecError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    Ok((kind, chars.as_str()))
}

fn split_namespace(rest: &str) -> (String, &str) {
    if !rest.starts_with('/') {
        return (DEFAULT_NAMESPACE.to_string(), rest);
    }
    match rest.find(',') {
        Some(idx) => (rest[..idx].to_string(), &rest[idx + 1..]),
        None => (rest.to_string(), ""),
    }
}

fn split_event(data: Option<Value>) -> Result<(String, Option<Value>), CodecError> {
    let Some(Value::Array(args)) = data else {
        return Err(CodecError::BadEvent);
    };
    let mut args = args.into_iter();
    let name = match args.next() {
        Some(Value::String(name)) => name,
        _ => return Err(CodecError::BadEvent),
    };
    Ok((name, args.next()))
}

// ========================
// Encoding
// ========================

/// Event frame for the default namespace: `42["name"]` or `42["name",payload]`.
pub fn encode_event(name: &str, payload: Option<&Value>) -> String {
    let mut args = vec![Value::String(name.to_string())];
    if let Some(payload) = payload {
        args.push(payload.clone());
    }
    format!("42{}", Value::Array(args))
}

/// Pong echoing the ping body (`probe` during upgrades, usually empty).
pub fn encode_pong(body: &str) -> String {
    format!("3{body}")
}
