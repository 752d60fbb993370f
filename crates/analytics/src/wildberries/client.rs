use anyhow::Result;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::shared::config::Config;

/// Statistics API — отчёт о продажах
pub const STATISTICS_API_BASE: &str = "https://statistics-api.wildberries.ru";

/// Seller Analytics API — платное хранение, остатки
pub const ANALYTICS_API_BASE: &str = "https://seller-analytics-api.wildberries.ru";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP-клиент для работы с Wildberries Statistics/Analytics API.
///
/// На каждый запрос действует таймаут клиента — в исходной системе
/// per-request таймаутов не было, здесь добавлены сознательно.
pub struct WildberriesApiClient {
    client: reqwest::Client,
    statistics_base_url: String,
    analytics_base_url: String,
}

impl WildberriesApiClient {
    pub fn new() -> Self {
        Self::with_base_urls(STATISTICS_API_BASE, ANALYTICS_API_BASE, DEFAULT_TIMEOUT_SECS)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_base_urls(
            &config.wildberries.statistics_base_url,
            &config.wildberries.analytics_base_url,
            config.wildberries.request_timeout_secs,
        )
    }

    pub fn with_base_urls(
        statistics_base_url: &str,
        analytics_base_url: &str,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            statistics_base_url: statistics_base_url.trim_end_matches('/').to_string(),
            analytics_base_url: analytics_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn statistics_url(&self, path: &str) -> String {
        format!("{}{}", self.statistics_base_url, path)
    }

    pub fn analytics_url(&self, path: &str) -> String {
        format!("{}{}", self.analytics_base_url, path)
    }

    /// Очистка API-ключа от невидимых символов; ключ с не-ASCII символами
    /// невалиден для HTTP-заголовка
    fn sanitize_api_key(api_key: &str) -> Result<String> {
        let api_key = api_key.trim().replace(['\n', '\r', '\t'], "");
        if api_key.is_empty() {
            anyhow::bail!("API key is empty");
        }
        if !api_key.is_ascii() {
            anyhow::bail!("API key contains non-ASCII characters");
        }
        Ok(api_key)
    }

    /// GET-запрос с авторизацией и разбором JSON-ответа
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let api_key = Self::sanitize_api_key(api_key)?;

        tracing::debug!("GET {}", url);
        let start_time = std::time::Instant::now();

        let response = match self
            .client
            .get(url)
            .query(query)
            .header("Authorization", api_key.as_str())
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    format!("Request to {} timed out", url)
                } else if e.is_connect() {
                    format!("Connection error for {}: {}", url, e)
                } else {
                    format!("Network error for {}: {}", url, e)
                };
                tracing::error!("{}", error_msg);
                return Err(anyhow::anyhow!("{}", error_msg));
            }
        };

        let status = response.status();
        tracing::debug!(
            "Response {} in {:.2}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("WB API returned {} for {}: {}", status, url, body);
            anyhow::bail!("WB API request failed with status {}: {}", status, body);
        }

        let body = response.text().await?;

        match serde_json::from_str::<T>(&body) {
            Ok(data) => Ok(data),
            Err(e) => {
                let preview: String = body.chars().take(500).collect();
                tracing::error!("Failed to parse WB API response: {}", e);
                anyhow::bail!("Failed to parse WB API JSON: {}. Response: {}", e, preview)
            }
        }
    }
}

impl Default for WildberriesApiClient {
    fn default() -> Self {
        Self::new()
    }
}
