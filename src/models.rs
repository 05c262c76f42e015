//! Frontend Models
//!
//! Data structures matching backend payloads.

use serde::{Deserialize, Deserializer};

/// One domain under auction (matches backend)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuctionItem {
    /// Unique key within the list
    pub domain_name: String,
    pub current_bid: f64,
    /// Our standing bid; only the dashboard renders it
    #[serde(default, deserialize_with = "zero_if_null")]
    pub my_current_bid: f64,
    /// 0 means no cap
    #[serde(default, deserialize_with = "zero_if_null")]
    pub max_bid: f64,
    #[serde(default)]
    pub time_left: String,
    #[serde(default)]
    pub auto_bid_enabled: bool,
    #[serde(default)]
    pub bid_count: Option<u32>,
    #[serde(default)]
    pub auction_id: Option<String>,
}

impl AuctionItem {
    pub fn has_my_bid(&self) -> bool {
        self.my_current_bid > 0.0
    }

    /// Our bid is at or above the current price
    pub fn is_winning(&self) -> bool {
        self.has_my_bid() && self.my_current_bid >= self.current_bid
    }
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(|v| v.unwrap_or(0.0))
}

// ========================
// Push Event Payloads
// ========================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuctionUpdate {
    #[serde(default, alias = "auctions")]
    pub items: Vec<AuctionItem>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BidOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BidResult {
    pub domain: String,
    pub amount: f64,
    pub result: BidOutcome,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AutoBidExecuted {
    pub domain: String,
    pub amount: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitoringStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}
