use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Shared tuning for provider HTTP clients. Model calls can be slow, so the
/// request timeout is generous; the rollout itself has none.
pub fn build_provider_client() -> Client {
    build_provider_client_with_timeout(REQUEST_TIMEOUT_SECS)
}

pub fn build_provider_client_with_timeout(timeout_secs: u64) -> Client {
    ensure_crypto_provider();
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Library callers (and tests) may build clients without going through the
/// binary, which normally installs the provider at startup.
fn ensure_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        // Losing a race to another installer is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}
