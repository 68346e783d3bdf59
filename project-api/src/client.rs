use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::transport::{self, ApiRequest, RawResponse, Transport};

/// Client for the project API server. Stateless apart from the server address; every method
/// is one or more blocking round trips.
#[derive(Debug, Clone)]
pub struct ProjectApi<T> {
    address: Url,
    transport: T,
}

/// Builds a client using the transport the configuration asks for.
pub fn client(config: &ApiConfig) -> Result<ProjectApi<Box<dyn Transport>>> {
    let transport = transport::transport(config)?;
    Ok(ProjectApi::new(config.address().clone(), transport))
}

impl<T: Transport> ProjectApi<T> {
    pub fn new(address: Url, transport: T) -> Self {
        Self { address, transport }
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        self.transport.send(&request)?.error_for_status()
    }

    pub(crate) fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        let response = self.send(ApiRequest::get(url))?;
        decode(&response)
    }

    pub(crate) fn post<B: Serialize, R: DeserializeOwned>(&self, url: Url, body: &B) -> Result<R> {
        let response = self.send(ApiRequest::post(url, serde_json::to_value(body)?))?;
        decode(&response)
    }

    pub(crate) fn put<B: Serialize, R: DeserializeOwned>(&self, url: Url, body: &B) -> Result<R> {
        let response = self.send(ApiRequest::put(url, serde_json::to_value(body)?))?;
        decode(&response)
    }

    /// The response body of a delete is ignored.
    pub(crate) fn delete(&self, url: Url) -> Result<()> {
        self.send(ApiRequest::delete(url))?;
        Ok(())
    }
}

fn decode<R: DeserializeOwned>(response: &RawResponse) -> Result<R> {
    Ok(serde_json::from_str(response.body())?)
}
