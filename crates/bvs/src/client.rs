use bvs_core::error::{classify_response, BvsError};
use bvs_core::query::search_endpoint;
use serde_json::Value;
use std::time::Duration;

use crate::config::{BvsConfig, ResolvedEndpoint};

/// Create an HTTP client carrying the endpoint's `apikey` header
pub fn create_bvs_client(
    config: &BvsConfig,
    endpoint: &ResolvedEndpoint,
) -> Result<reqwest::Client, BvsError> {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("apikey"),
        HeaderValue::from_str(&endpoint.api_key).map_err(|e| BvsError::Configuration {
            resource: endpoint.base_url.clone(),
            message: format!("Invalid API key header value: {e}"),
        })?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .danger_accept_invalid_certs(!config.verify_tls)
        .build()
        .map_err(|e| BvsError::connection(format!("Failed to build HTTP client: {e}")))
}

/// GET a URL and classify the outcome
///
/// Transport failures, including timeouts, become [`BvsError::Connection`];
/// nothing is retried.
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, BvsError> {
    log::debug!("GET {url}");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| BvsError::connection(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| BvsError::connection(format!("Failed to read response body: {e}")))?;

    log::debug!("{status} from {url} ({} bytes)", body.len());
    classify_response(status, &body)
}

/// Check that the search endpoint answers at all
///
/// Only transport failures count; the status code of the probe is ignored.
pub async fn probe_connection(client: &reqwest::Client, base_url: &str) -> Result<(), BvsError> {
    let url = format!("{}?count=0&format=json", search_endpoint(base_url));
    log::debug!("Probing {url}");

    client
        .get(&url)
        .send()
        .await
        .map(|_| ())
        .map_err(|e| BvsError::connection(e.to_string()))
}
