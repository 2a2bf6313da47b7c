pub mod charts;
pub mod predictions;
pub mod sites;
pub mod statistics;

use common::ApiResponse;
use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};

use crate::settings;

/// Error body returned by the backend for every non-2xx response
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub success: bool,
}

/// Percent-encodes a query string value.
pub fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

/// Turns a non-OK response into the backend's error message, falling back to
/// the HTTP status when the body is not an `ErrorResponse`.
async fn error_message(method: &str, endpoint: &str, response: Response) -> String {
    log::warn!("{} {} - Non-OK response: {}", method, endpoint, response.status());
    match response.json::<ErrorResponse>().await {
        Ok(err) => {
            log::error!("{} {} - API error {}: {}", method, endpoint, err.code, err.error);
            err.error
        }
        Err(_) => {
            let error_msg = format!("HTTP error: {}", response.status());
            log::error!("{} {} - {}", method, endpoint, error_msg);
            error_msg
        }
    }
}

async fn unwrap_data<T>(method: &str, endpoint: &str, response: Response) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
{
    if !response.ok() {
        return Err(error_message(method, endpoint, response).await);
    }

    log::trace!("{} {} - Response received, parsing JSON", method, endpoint);
    let api_response: ApiResponse<T> = response.json().await.map_err(|e| {
        let error_msg = format!("Failed to parse response: {}", e);
        log::error!("{} {} - {}", method, endpoint, error_msg);
        error_msg
    })?;

    log::info!("{} {} - {}", method, endpoint, api_response.message);
    Ok(api_response.data)
}

/// Common GET request handler
pub async fn get<T>(endpoint: &str) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
{
    let url = settings::get_settings().api_url(endpoint);
    log::debug!("GET request to: {}", url);

    let response = Request::get(&url).send().await.map_err(|e| {
        let error_msg = format!("Request failed: {}", e);
        log::error!("GET {} - {}", endpoint, error_msg);
        error_msg
    })?;

    unwrap_data("GET", endpoint, response).await
}

/// Common POST request handler
pub async fn post<T, B>(endpoint: &str, body: &B) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
    B: Serialize,
{
    let url = settings::get_settings().api_url(endpoint);
    log::debug!("POST request to: {}", url);

    let response = Request::post(&url)
        .json(body)
        .map_err(|e| {
            let error_msg = format!("Failed to serialize request: {}", e);
            log::error!("POST {} - {}", endpoint, error_msg);
            error_msg
        })?
        .send()
        .await
        .map_err(|e| {
            let error_msg = format!("Request failed: {}", e);
            log::error!("POST {} - {}", endpoint, error_msg);
            error_msg
        })?;

    unwrap_data("POST", endpoint, response).await
}
