use crate::core::fetch::CancelToken;
use crate::error::ApiError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("qdash-cli/", env!("CARGO_PKG_VERSION"));
const GENERIC_TRANSPORT_MESSAGE: &str = "Network request failed";

/// Thin HTTP GET client for the statistics backend.
///
/// One fixed request timeout applies to every call; exceeding it is a
/// transport failure like any other. Cancellation is observed through
/// the token raced against the exchange, so an abort also tears down
/// the in-flight connection.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(StatsClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_default_timeout(base_url: String) -> Result<Self, ApiError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET `endpoint` with the given query pairs and return the parsed
    /// JSON body. Fails with `ApiError::Cancelled` as soon as `token`
    /// fires, distinct from every transport failure.
    pub async fn get_json(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        token: &CancelToken,
    ) -> Result<Value, ApiError> {
        let request = self.client.get(self.endpoint_url(endpoint)).query(query);

        let exchange = async {
            let response = request.send().await.map_err(transport_error)?;
            handle_response(response, endpoint).await
        };

        tokio::select! {
            result = exchange => result,
            _ = token.cancelled() => Err(ApiError::Cancelled),
        }
    }
}

/// Map status + body into the uniform error shape: 2xx parses as JSON,
/// anything else fails with the server's `detail` field or a
/// status-based generic message.
async fn handle_response(response: reqwest::Response, endpoint: &str) -> Result<Value, ApiError> {
    let status = response.status();

    if status.is_success() {
        response.json::<Value>().await.map_err(|e| ApiError::Decode {
            message: format!("{} returned malformed JSON: {}", endpoint, e),
        })
    } else {
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

        Err(ApiError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            detail,
        })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    let message = err.to_string();
    ApiError::Transport {
        message: if message.is_empty() {
            GENERIC_TRANSPORT_MESSAGE.to_string()
        } else {
            message
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = StatsClient::with_default_timeout("http://example.test".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_endpoint_url_joins_base_and_path() {
        let client = StatsClient::with_default_timeout("http://example.test/api/v1".to_string())
            .expect("client creation failed");
        assert_eq!(
            client.endpoint_url("/overall"),
            "http://example.test/api/v1/overall"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = StatsClient::with_default_timeout("http://example.test/api/v1/".to_string())
            .expect("client creation failed");
        assert_eq!(client.base_url(), "http://example.test/api/v1");
        assert_eq!(
            client.endpoint_url("/pre-delivery/overview"),
            "http://example.test/api/v1/pre-delivery/overview"
        );
    }
}
