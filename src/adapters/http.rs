use crate::config::SourceSettings;
use crate::domain::model::TopScorersResponse;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_required_field;
use reqwest::Client;
use std::time::Duration;

/// Longest error body kept in `EtlError::HttpStatus`.
const MAX_ERROR_BODY: usize = 2048;

/// Client for the API-Football `players/topscorers` endpoint.
pub struct ApiFootballClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_key_header: String,
    league: u32,
    season: u32,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl ApiFootballClient {
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        let api_key = validate_required_field("api_key", &settings.api_key)?.clone();

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key,
            api_key_header: settings.api_key_header.clone(),
            league: settings.league,
            season: settings.season,
            retry_attempts: settings.retry_attempts,
            retry_delay: Duration::from_secs(settings.retry_delay_seconds),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the season's scorers, retrying timeouts, connection failures and 5xx/429.
    pub async fn fetch_top_scorers(&self) -> Result<TopScorersResponse> {
        let max_attempts = self.retry_attempts + 1;
        let mut attempt = 1;

        loop {
            match self.fetch_once().await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(
                        "🔄 Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self) -> Result<TopScorersResponse> {
        tracing::debug!(
            "Making API request to: {} (league={}, season={})",
            self.endpoint,
            self.league,
            self.season
        );

        let response = self
            .client
            .get(&self.endpoint)
            .header(self.api_key_header.as_str(), self.api_key.as_str())
            .query(&[("league", self.league), ("season", self.season)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(EtlError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: TopScorersResponse = serde_json::from_slice(&bytes)?;

        if let Some(errors) = parsed.api_errors() {
            tracing::warn!("⚠️ API reported errors: {}", errors);
        }
        tracing::debug!(
            "API returned {} scorers (results={:?})",
            parsed.response.len(),
            parsed.results
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn settings(endpoint: String) -> SourceSettings {
        SourceSettings {
            endpoint,
            api_key: Some("test-key".to_string()),
            retry_attempts: 2,
            retry_delay_seconds: 0,
            ..SourceSettings::default()
        }
    }

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "errors": [],
            "results": 1,
            "response": [{
                "player": {"name": "M. Salah", "birth": {"date": "1992-06-15"}},
                "statistics": [{
                    "team": {"name": "Liverpool"},
                    "games": {"appearences": 32, "minutes": 2536},
                    "goals": {"total": 18, "assists": 10},
                    "penalty": {"scored": 5}
                }]
            }]
        })
    }

    #[tokio::test]
    async fn test_sends_key_header_and_query() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/players/topscorers")
                    .header("X-RapidAPI-Key", "test-key")
                    .query_param("league", "39")
                    .query_param("season", "2023");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(sample_body());
            })
            .await;

        let client = ApiFootballClient::new(&settings(server.url("/players/topscorers"))).unwrap();
        let response = client.fetch_top_scorers().await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(response.response.len(), 1);
        assert_eq!(response.response[0].player.name, "M. Salah");
        assert_eq!(response.results, Some(1));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_surfaced() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/players/topscorers");
                then.status(503).body("maintenance");
            })
            .await;

        let client = ApiFootballClient::new(&settings(server.url("/players/topscorers"))).unwrap();
        let result = client.fetch_top_scorers().await;

        api_mock.assert_hits_async(3).await;
        match result {
            Err(EtlError::HttpStatus { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected HttpStatus error, got {:?}", other.map(|r| r.results)),
        }
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/players/topscorers");
                then.status(403).body("{\"message\":\"forbidden\"}");
            })
            .await;

        let client = ApiFootballClient::new(&settings(server.url("/players/topscorers"))).unwrap();
        let result = client.fetch_top_scorers().await;

        api_mock.assert_hits_async(1).await;
        assert!(matches!(result, Err(EtlError::HttpStatus { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_timeouts_are_retried() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/players/topscorers");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .json_body(sample_body());
            })
            .await;

        let mut s = settings(server.url("/players/topscorers"));
        s.timeout_seconds = 1;
        let client = ApiFootballClient::new(&s).unwrap();
        let result = client.fetch_top_scorers().await;

        api_mock.assert_hits_async(3).await;
        match result {
            Err(e @ EtlError::ApiError(_)) => assert!(e.is_retryable()),
            other => panic!("expected ApiError, got {:?}", other.map(|r| r.results)),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_retryable_api_error() {
        // Reserve a port, then free it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = ApiFootballClient::new(&settings(format!(
            "http://127.0.0.1:{}/players/topscorers",
            port
        )))
        .unwrap();

        match client.fetch_top_scorers().await {
            Err(EtlError::ApiError(e)) => assert!(e.is_connect()),
            other => panic!("expected ApiError, got {:?}", other.map(|r| r.results)),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/players/topscorers");
                then.status(429).body("Too many requests");
            })
            .await;

        let client = ApiFootballClient::new(&settings(server.url("/players/topscorers"))).unwrap();
        let result = client.fetch_top_scorers().await;

        api_mock.assert_hits_async(3).await;
        assert!(matches!(result, Err(EtlError::HttpStatus { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_invalid_json_is_serialization_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/players/topscorers");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let client = ApiFootballClient::new(&settings(server.url("/players/topscorers"))).unwrap();
        assert!(matches!(
            client.fetch_top_scorers().await,
            Err(EtlError::SerializationError(_))
        ));
    }

    #[test]
    fn test_new_requires_api_key() {
        let mut s = settings("http://localhost/players/topscorers".to_string());
        s.api_key = None;
        assert!(matches!(
            ApiFootballClient::new(&s),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}
