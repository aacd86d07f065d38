//! Live HTTP clearinghouse adapter
//!
//! Bearer-key authenticated JSON client with bounded retry: transient
//! failures (connection errors, timeouts, 429/5xx) are retried up to the
//! configured attempt count with exponential backoff, then surfaced as the
//! final [`PortError`]. Non-transient failures surface immediately.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edi_kernel::{
    ClearinghouseApi, PortError, TransactionDirection, TransactionEnvelope,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClearinghouseConfig;

/// HTTP implementation of the clearinghouse port
pub struct HttpClearinghouse {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl HttpClearinghouse {
    /// Builds a live adapter from configuration
    ///
    /// Fails when no API key is configured; deployments without one should
    /// construct a [`crate::SandboxClearinghouse`] instead, per
    /// [`ClearinghouseConfig::mode`].
    pub fn new(config: &ClearinghouseConfig) -> Result<Self, PortError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                PortError::validation("live clearinghouse adapter requires an API key")
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_ms: config.timeout_ms,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Sends a request, retrying transient failures with backoff
    async fn request_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, PortError> {
        let url = format!("{}{}", self.base_url, path);
        with_retry(
            self.max_retries,
            Duration::from_millis(self.retry_delay_ms),
            &url,
            || self.send_once(method.clone(), &url, body),
        )
        .await
    }

    async fn send_once(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, PortError> {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PortError::Timeout {
                    operation: url.to_string(),
                    duration_ms: self.timeout_ms,
                }
            } else {
                PortError::Connection {
                    message: format!("request to {url} failed"),
                    source: Some(Box::new(e)),
                }
            }
        })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "clearinghouse response");

        match status {
            s if s.is_success() => response.json::<Value>().await.map_err(|e| {
                PortError::Transformation {
                    message: format!("invalid JSON from {url}: {e}"),
                }
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PortError::Unauthorized {
                message: format!("clearinghouse rejected credentials ({status})"),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(PortError::RateLimited {
                retry_after_secs: retry_after_secs(&response),
            }),
            s if s.is_server_error() => Err(PortError::ServiceUnavailable {
                service: format!("clearinghouse ({status})"),
            }),
            _ => Err(PortError::internal(format!(
                "unexpected clearinghouse status {status} from {url}"
            ))),
        }
    }
}

/// Runs an operation up to `max_attempts` times, doubling the delay between
/// tries, then surfaces the final error
///
/// Only errors classified transient by [`PortError::is_transient`] are
/// retried; everything else surfaces immediately.
async fn with_retry<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    operation: &str,
    mut op: F,
) -> Result<T, PortError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, PortError>>,
{
    let mut delay = base_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt < max_attempts => {
                warn!(
                    %operation,
                    attempt,
                    max_attempts,
                    %error,
                    "transient clearinghouse failure, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(error) => return Err(error),
        }
    }
}

fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

#[async_trait]
impl ClearinghouseApi for HttpClearinghouse {
    async fn check_eligibility(&self, payload: Value) -> Result<Value, PortError> {
        self.request_json(reqwest::Method::POST, "/eligibility/check", Some(&payload))
            .await
    }

    async fn list_transactions(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransactionEnvelope>, PortError> {
        let raw = self
            .request_json(
                reqwest::Method::GET,
                &format!("/transactions?since={}", since.to_rfc3339()),
                None,
            )
            .await?;

        let entries = raw
            .get("transactions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(entries.iter().filter_map(parse_envelope).collect())
    }

    async fn fetch_remittance(&self, transaction_id: &str) -> Result<Value, PortError> {
        self.request_json(
            reqwest::Method::GET,
            &format!("/transactions/{transaction_id}/remittance"),
            None,
        )
        .await
    }

    async fn claim_status(
        &self,
        claim_control_number: &str,
        payer_id: &str,
    ) -> Result<Value, PortError> {
        self.request_json(
            reqwest::Method::POST,
            "/claims/status",
            Some(&json!({
                "claimControlNumber": claim_control_number,
                "payerId": payer_id,
            })),
        )
        .await
    }
}

fn parse_envelope(raw: &Value) -> Option<TransactionEnvelope> {
    let transaction_id = raw
        .get("transactionId")
        .or_else(|| raw.get("transaction_id"))
        .and_then(Value::as_str)?
        .to_string();
    let direction = match raw.get("direction").and_then(Value::as_str) {
        Some("inbound") | Some("INBOUND") => TransactionDirection::Inbound,
        _ => TransactionDirection::Outbound,
    };
    let transaction_class = raw
        .get("transactionClass")
        .or_else(|| raw.get("transaction_class"))
        .or_else(|| raw.get("type"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let received_at = raw
        .get("receivedAt")
        .or_else(|| raw.get("received_at"))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Some(TransactionEnvelope {
        transaction_id,
        direction,
        transaction_class,
        received_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_stops_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), PortError> =
            with_retry(3, Duration::from_millis(1), "test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(PortError::connection("connection refused")) }
            })
            .await;

        assert!(matches!(result, Err(PortError::Connection { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_first_success() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(3, Duration::from_millis(1), "test", || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt < 2 {
                    Err(PortError::ServiceUnavailable {
                        service: "clearinghouse".to_string(),
                    })
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_surfaces_immediately() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), PortError> =
            with_retry(3, Duration::from_millis(1), "test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(PortError::validation("missing member id")) }
            })
            .await;

        assert!(matches!(result, Err(PortError::Validation { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_adapter_requires_api_key() {
        let config = ClearinghouseConfig::default();
        assert!(matches!(
            HttpClearinghouse::new(&config),
            Err(PortError::Validation { .. })
        ));

        let with_key = ClearinghouseConfig {
            api_key: Some("sk_live_abc123".to_string()),
            ..Default::default()
        };
        assert!(HttpClearinghouse::new(&with_key).is_ok());
    }
}
