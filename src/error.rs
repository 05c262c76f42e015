//! Request Errors
//!
//! Transport failures and application-level rejections share one type so
//! every caller reports them the same way.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    /// Well-formed response with `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Text for a toast body: the server's own words when it sent any.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(message) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let rejected = ApiError::Rejected("Bid must exceed $20".into());
        assert_eq!(rejected.user_message("Bid request failed."), "Bid must exceed $20");

        let network = ApiError::Network("connection refused".into());
        assert_eq!(network.user_message("Bid request failed."), "Bid request failed.");
        assert_eq!(network.to_string(), "network error: connection refused");
    }
}
