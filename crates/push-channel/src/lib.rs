//! Push Channel
//!
//! Named-event push channel for browser front ends, speaking Socket.IO v4
//! over the Engine.IO WebSocket transport.
//!
//! `codec` is plain Rust and runs anywhere; `channel` needs a browser.

pub mod codec;
mod channel;

pub use channel::{PushChannel, CONNECT_EVENT, CONNECT_ERROR_EVENT, DISCONNECT_EVENT};
pub use codec::{CodecError, EnginePacket, Handshake, SocketPacket};

/// Socket.IO endpoint for a page served from `protocol//host`.
///
/// `protocol` is what `window.location.protocol` reports (`"https:"` etc).
pub fn socket_url(protocol: &str, host: &str, path: &str) -> String {
    let scheme = if protocol.starts_with("https") { "wss" } else { "ws" };
    let path = path.trim_end_matches('/');
    format!("{scheme}://{host}{path}/?EIO=4&transport=websocket")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_url_follows_page_scheme() {
        assert_eq!(
            socket_url("https:", "bids.example.com", "/socket.io"),
            "wss://bids.example.com/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("http:", "localhost:10000", "/socket.io/"),
            "ws://localhost:10000/socket.io/?EIO=4&transport=websocket"
        );
    }
}
