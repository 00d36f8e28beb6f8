use std::time::Duration;

use crate::config::CatalogConfig;
use crate::error::{AppError, AppResult};

/// Builds the outbound HTTP client used for the remote catalog.
///
/// One client is built at startup and shared through `AppState`, so
/// connections and DNS lookups are pooled across requests.
///
/// - **Timeouts**: request and connect timeouts from `[catalog]`
/// - **Compression**: gzip, deflate, brotli and zstd response decoding
/// - **HTTP/2**: adaptive window sizing and keep-alive pings
pub fn build_http_client(config: &CatalogConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(format!("basket-rs/{}", crate::pkg_version()))
        .build()
        .map_err(|e| AppError::Configuration {
            key: "catalog".to_string(),
            source: anyhow::Error::from(e),
        })
}
