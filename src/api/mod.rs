//! Backend API
//!
//! JSON endpoints consumed by the desk, behind a trait so the controller
//! can be driven without a browser.

mod http;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::AuctionItem;

pub use http::HttpApi;

// ========================
// Argument Structs
// ========================

#[derive(Debug, Serialize)]
pub struct LoginArgs<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BidArgs<'a> {
    pub domain_name: &'a str,
    pub bid_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct SettingsArgs<'a> {
    pub domain_name: &'a str,
    pub max_bid: f64,
    pub auto_bid: bool,
}

// ========================
// Responses
// ========================

/// `{success, message?}` acknowledgement shared by the POST endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiAck {
    pub fn ok(message: &str) -> Self {
        Self { success: true, message: Some(message.to_string()) }
    }

    pub fn rejected(message: &str) -> Self {
        Self { success: false, message: Some(message.to_string()) }
    }

    /// Turn `success: false` into [`ApiError::Rejected`]; yields the message.
    pub fn into_result(self) -> Result<String, ApiError> {
        let message = self.message.unwrap_or_default();
        if self.success {
            Ok(message)
        } else {
            Err(ApiError::Rejected(message))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuctionsResponse {
    pub success: bool,
    #[serde(default, alias = "auctions")]
    pub items: Vec<AuctionItem>,
    #[serde(default)]
    pub max_bid_limit: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful `/api/auctions` payload
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionListing {
    pub items: Vec<AuctionItem>,
    pub max_bid_limit: Option<f64>,
}

impl AuctionsResponse {
    pub fn into_result(self) -> Result<AuctionListing, ApiError> {
        if self.success {
            Ok(AuctionListing { items: self.items, max_bid_limit: self.max_bid_limit })
        } else {
            Err(ApiError::Rejected(self.message.unwrap_or_default()))
        }
    }
}

// ========================
// API Seam
// ========================

/// The four backend endpoints.
///
/// Any transport failure, non-2xx status or malformed body comes back as
/// `Err`; `success: false` bodies come back as `Ok` and are turned into
/// errors by the caller via `into_result`.
#[allow(async_fn_in_trait)]
pub trait AuctionApi {
    /// `POST /api/login`
    async fn login(&self, args: &LoginArgs<'_>) -> Result<ApiAck, ApiError>;
    /// `GET /api/auctions`
    async fn list_auctions(&self) -> Result<AuctionsResponse, ApiError>;
    /// `POST /api/bid`
    async fn place_bid(&self, args: &BidArgs<'_>) -> Result<ApiAck, ApiError>;
    /// `POST /api/settings`
    async fn save_settings(&self, args: &SettingsArgs<'_>) -> Result<ApiAck, ApiError>;
}
