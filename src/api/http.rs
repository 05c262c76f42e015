//! HTTP Transport
//!
//! `AuctionApi` over the browser fetch API via gloo-net.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{ApiAck, AuctionApi, AuctionsResponse, BidArgs, LoginArgs, SettingsArgs};
use crate::config::DeskConfig;
use crate::error::ApiError;

/// Same-origin JSON client for the backend endpoints
#[derive(Debug, Clone)]
pub struct HttpApi {
    login_url: String,
    auctions_url: String,
    bid_url: String,
    settings_url: String,
}

impl HttpApi {
    pub fn new(config: &DeskConfig) -> Self {
        Self {
            login_url: config.login_endpoint.clone(),
            auctions_url: config.auctions_endpoint.clone(),
            bid_url: config.bid_endpoint.clone(),
            settings_url: config.settings_endpoint.clone(),
        }
    }
}

impl AuctionApi for HttpApi {
    async fn login(&self, args: &LoginArgs<'_>) -> Result<ApiAck, ApiError> {
        post_json(&self.login_url, args).await
    }

    async fn list_auctions(&self) -> Result<AuctionsResponse, ApiError> {
        debug!(url = %self.auctions_url, "GET");
        let response = Request::get(&self.auctions_url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn place_bid(&self, args: &BidArgs<'_>) -> Result<ApiAck, ApiError> {
        post_json(&self.bid_url, args).await
    }

    async fn save_settings(&self, args: &SettingsArgs<'_>) -> Result<ApiAck, ApiError> {
        post_json(&self.settings_url, args).await
    }
}

async fn post_json<B, T>(url: &str, body: &B) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    debug!(url, "POST");
    let response = Request::post(url)
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}
