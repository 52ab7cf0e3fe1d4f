//! HTTP client for the bot endpoint that relays deals to a messenger.

use super::models::{BotStatus, Delivery, SendDealRequest, SendDealResponse};
use crate::config::Config;
use crate::deals::TourDeal;
use crate::error::{endpoint_message, DealError};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

const DEFAULT_REJECTION: &str = "bot rejected the deal";

/// Trait for bot operations - enables mocking for tests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Submits a single deal for delivery.
    ///
    /// Transport problems come back as [`DealError::Send`]; an answer of
    /// `success: false` comes back as [`DealError::Rejected`] with the
    /// endpoint's text.
    async fn send_deal(&self, deal: &TourDeal) -> Result<Delivery, DealError>;

    /// Reports whether the bot is up and has its credentials.
    async fn status(&self) -> Result<BotStatus, DealError>;
}

/// Bot endpoint HTTP client.
pub struct BotClient {
    client: Client,
    url: String,
}

impl BotClient {
    /// Creates a bot client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_url(config.bot_url.clone(), config.request_timeout())
    }

    /// Creates a bot client for an explicit endpoint URL.
    pub fn with_url(url: String, timeout: Duration) -> Result<Self> {
        let client =
            Client::builder().timeout(timeout).connect_timeout(Duration::from_secs(10)).build()?;

        Ok(Self { client, url })
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for BotClient {
    async fn send_deal(&self, deal: &TourDeal) -> Result<Delivery, DealError> {
        debug!("POST {} (deal {})", self.url, deal.id);

        let payload = serde_json::to_string(&SendDealRequest { deal })
            .map_err(|e| DealError::Send(format!("failed to encode deal: {}", e)))?;

        let response = self
            .client
            .post(self.url.as_str())
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| DealError::Send(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DealError::Send(format!("failed to read response body: {}", e)))?;

        // Any JSON answer is the bot speaking; the status code only matters when it is not JSON
        let answer: SendDealResponse = serde_json::from_str(&body).map_err(|_| {
            DealError::Send(format!("non-JSON response (status {})", status.as_u16()))
        })?;

        if answer.success {
            info!("Deal {} delivered", deal.id);
            Ok(Delivery { message_id: answer.message_id, message: answer.message })
        } else {
            let reason = answer.error.unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            warn!("Bot rejected deal {}: {}", deal.id, reason);
            Err(DealError::Rejected(reason))
        }
    }

    async fn status(&self) -> Result<BotStatus, DealError> {
        debug!("GET {}", self.url);

        let response = self
            .client
            .get(self.url.as_str())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DealError::Send(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DealError::Send(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(DealError::Send(endpoint_message(status.as_u16(), &body)));
        }

        serde_json::from_str(&body).map_err(|e| DealError::Send(format!("invalid response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_deal() -> TourDeal {
        TourDeal {
            id: "1".to_string(),
            destination: "Мальдивы".to_string(),
            image_url: "https://images.unsplash.com/photo-1514282401047-d79a71a590e8?w=400"
                .to_string(),
            current_price: 1299.0,
            original_price: 2599.0,
            discount: 50,
            url: "https://travelata.ru/deal/1".to_string(),
            found_at: None,
        }
    }

    fn client_for(server: &MockServer) -> BotClient {
        BotClient::with_url(format!("{}/bot", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_deal_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot"))
            .and(header("Content-Type", "application/json"))
            .and(body_partial_json(json!({"deal": {"id": "1", "destination": "Мальдивы"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Deal sent to Telegram",
                "messageId": 77
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let delivery = client_for(&mock_server).send_deal(&make_deal()).await.unwrap();
        assert_eq!(delivery.message_id, Some(77));
        assert_eq!(delivery.message.as_deref(), Some("Deal sent to Telegram"));
    }

    #[tokio::test]
    async fn test_send_deal_rejected_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "bad chat id"})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_deal(&make_deal()).await.unwrap_err();
        assert_eq!(err, DealError::Rejected("bad chat id".to_string()));
        assert_eq!(err.to_string(), "bad chat id");
    }

    #[tokio::test]
    async fn test_send_deal_error_status_with_json_is_rejection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": "Telegram credentials not configured"})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_deal(&make_deal()).await.unwrap_err();
        assert_eq!(err, DealError::Rejected("Telegram credentials not configured".to_string()));
    }

    #[tokio::test]
    async fn test_send_deal_rejected_without_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_deal(&make_deal()).await.unwrap_err();
        assert_eq!(err, DealError::Rejected(DEFAULT_REJECTION.to_string()));
    }

    #[tokio::test]
    async fn test_send_deal_non_json_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).send_deal(&make_deal()).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("non-JSON"));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_send_deal_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            BotClient::with_url(format!("http://{}/bot", addr), Duration::from_secs(2)).unwrap();

        let err = client.send_deal(&make_deal()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bot"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "Bot is running", "configured": true})),
            )
            .mount(&mock_server)
            .await;

        let status = client_for(&mock_server).status().await.unwrap();
        assert_eq!(status.status, "Bot is running");
        assert!(status.configured);
    }

    #[tokio::test]
    async fn test_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bot"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).status().await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_new_from_config() {
        let config = Config::default();
        let client = BotClient::new(&config).unwrap();
        assert_eq!(client.url(), config.bot_url);
    }
}
