//! Push Events
//!
//! Typed view of the named events the server pushes, and the glue that
//! subscribes the desk to a `PushChannel`.

use push_channel::{PushChannel, CONNECT_ERROR_EVENT, CONNECT_EVENT, DISCONNECT_EVENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{
    AuctionUpdate, AutoBidExecuted, BidResult, ErrorNotice, LoginResult, MonitoringStatus,
};

/// Every server event the desk subscribes to
pub const INBOUND_EVENTS: &[&str] = &[
    CONNECT_EVENT,
    DISCONNECT_EVENT,
    CONNECT_ERROR_EVENT,
    "login_result",
    "auction_update",
    "bid_result",
    "monitoring_started",
    "monitoring_stopped",
    "monitoring_status",
    "auto_bid_executed",
    "auto_bid_notification",
    "error",
];

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    Connected,
    Disconnected,
    LoginResult(LoginResult),
    AuctionUpdate(AuctionUpdate),
    BidResult(BidResult),
    MonitoringStarted,
    MonitoringStopped,
    AutoBidExecuted(AutoBidExecuted),
    Error(ErrorNotice),
}

#[derive(Debug, Error)]
pub enum PushDecodeError {
    #[error("unknown push event `{0}`")]
    UnknownEvent(String),
    #[error("bad `{event}` payload: {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown monitoring status `{0}`")]
    MonitoringStatus(String),
}

/// Outbound events; none carry a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundEvent {
    StartMonitoring,
    StopMonitoring,
}

impl OutboundEvent {
    pub fn name(self) -> &'static str {
        match self {
            OutboundEvent::StartMonitoring => "start_monitoring",
            OutboundEvent::StopMonitoring => "stop_monitoring",
        }
    }
}

/// Fire-and-forget sender for outbound events
pub trait PushEmitter: Clone + 'static {
    fn emit(&self, event: OutboundEvent);
}

impl PushEmitter for PushChannel {
    fn emit(&self, event: OutboundEvent) {
        PushChannel::emit(self, event.name(), None);
    }
}

pub fn decode_event(name: &str, payload: Option<Value>) -> Result<PushEvent, PushDecodeError> {
    let event = match name {
        CONNECT_EVENT => PushEvent::Connected,
        DISCONNECT_EVENT => PushEvent::Disconnected,
        CONNECT_ERROR_EVENT => PushEvent::Error(ErrorNotice {
            message: payload
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("Server refused the connection")
                .to_string(),
        }),
        "login_result" => PushEvent::LoginResult(payload_as(name, payload)?),
        "auction_update" => PushEvent::AuctionUpdate(payload_as(name, payload)?),
        "bid_result" => PushEvent::BidResult(payload_as(name, payload)?),
        "monitoring_started" => PushEvent::MonitoringStarted,
        "monitoring_stopped" => PushEvent::MonitoringStopped,
        "monitoring_status" => {
            let status: MonitoringStatus = payload_as(name, payload)?;
            match status.status.as_str() {
                "started" => PushEvent::MonitoringStarted,
                "stopped" => PushEvent::MonitoringStopped,
                other => return Err(PushDecodeError::MonitoringStatus(other.to_string())),
            }
        }
        "auto_bid_executed" | "auto_bid_notification" => {
            PushEvent::AutoBidExecuted(payload_as(name, payload)?)
        }
        "error" => PushEvent::Error(payload_as(name, payload)?),
        other => return Err(PushDecodeError::UnknownEvent(other.to_string())),
    };
    Ok(event)
}

fn payload_as<T: DeserializeOwned>(event: &str, payload: Option<Value>) -> Result<T, PushDecodeError> {
    serde_json::from_value(payload.unwrap_or(Value::Null)).map_err(|source| PushDecodeError::Payload {
        event: event.to_string(),
        source,
    })
}

/// Subscribe `on_event` to every inbound event on the channel.
pub fn subscribe<F>(channel: &PushChannel, on_event: F)
where
    F: Fn(PushEvent) + Clone + 'static,
{
    for &name in INBOUND_EVENTS {
        let on_event = on_event.clone();
        channel.on(name, move |payload| match decode_event(name, payload) {
            Ok(event) => on_event(event),
            Err(err) => warn!(%err, "dropping push event"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_every_subscribed_name() {
        let payloads = [
            ("login_result", Some(json!({"success": true}))),
            ("auction_update", Some(json!({"items": [], "timestamp": "t"}))),
            ("bid_result", Some(json!({"domain": "a.com", "amount": 20, "result": {"success": true}}))),
            ("monitoring_status", Some(json!({"status": "stopped"}))),
            ("auto_bid_executed", Some(json!({"domain": "a.com", "amount": 25, "message": "m"}))),
            ("auto_bid_notification", Some(json!({"domain": "a.com", "amount": 25}))),
            ("error", Some(json!({"message": "boom"}))),
        ];
        for (name, payload) in payloads {
            assert!(decode_event(name, payload).is_ok(), "{name}");
        }
        for name in INBOUND_EVENTS {
            assert!(!matches!(
                decode_event(name, Some(json!({"status": "started", "message": "x"}))),
                Err(PushDecodeError::UnknownEvent(_))
            ));
        }
    }

    #[test]
    fn test_monitoring_status_maps_to_started_stopped() {
        assert_eq!(
            decode_event("monitoring_status", Some(json!({"status": "started"}))).unwrap(),
            PushEvent::MonitoringStarted
        );
        assert!(matches!(
            decode_event("monitoring_status", Some(json!({"status": "paused"}))),
            Err(PushDecodeError::MonitoringStatus(_))
        ));
    }

    #[test]
    fn test_bad_payloads_are_errors() {
        assert!(matches!(
            decode_event("bid_result", None),
            Err(PushDecodeError::Payload { .. })
        ));
        assert!(matches!(
            decode_event("surprise", None),
            Err(PushDecodeError::UnknownEvent(_))
        ));
    }

    #[test]
    fn test_auction_update_payload() {
        let event = decode_event(
            "auction_update",
            Some(json!({"items": [{"domain_name": "a.com", "current_bid": 10.0}], "timestamp": "12:00:00"})),
        )
        .unwrap();
        let PushEvent::AuctionUpdate(update) = event else { panic!("expected update") };
        assert_eq!(update.items[0].domain_name, "a.com");
        assert_eq!(update.timestamp.as_deref(), Some("12:00:00"));
    }

    #[test]
    fn test_outbound_names() {
        assert_eq!(OutboundEvent::StartMonitoring.name(), "start_monitoring");
        assert_eq!(OutboundEvent::StopMonitoring.name(), "stop_monitoring");
    }
}
