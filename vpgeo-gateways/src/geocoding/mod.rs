use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use vpgeo_core::gateways::geocode::ProviderError;

pub mod nominatim;
pub mod photon;

pub use self::{nominatim::Nominatim, photon::Photon};

pub fn http_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder().user_agent(user_agent).build()
}

fn check_status(status: StatusCode) -> Result<(), ProviderError> {
    let code = status.as_u16();
    if let Some(err) = ProviderError::from_throttling_status(code) {
        return Err(err);
    }
    if !status.is_success() {
        return Err(ProviderError::Status(code));
    }
    Ok(())
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Connection(err.to_string())
    }
}

async fn fetch_json<T>(request: RequestBuilder) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(transport_error)?;
    log::debug!("Geocoding provider response: {}", response.status());
    check_status(response.status())?;
    let body = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body).map_err(|err| ProviderError::Malformed(err.to_string()))
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
