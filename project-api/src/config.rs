use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};
use crate::urls::parse_url;

pub const ADDRESS_VAR: &str = "PROJECT_API_ADDRESS";
pub const API_KEY_VAR: &str = "PROJECT_API_KEY";
pub const TIMEOUT_VAR: &str = "PROJECT_API_TIMEOUT_SECS";
pub const TRACE_VAR: &str = "PROJECT_API_TRACE";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Host-supplied settings for talking to the project API.
#[derive(Clone)]
pub struct ApiConfig {
    address: Url,
    api_key: Option<String>,
    timeout: Duration,
    trace_requests: bool,
}

impl ApiConfig {
    pub fn new(address: &str) -> Result<Self> {
        let address = parse_url(address)?;

        Ok(Self {
            address,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            trace_requests: true,
        })
    }

    pub fn from_env() -> Result<Self> {
        let address = env::var(ADDRESS_VAR)
            .map_err(|err| ApiError::Config(format!("`{ADDRESS_VAR}`: {err}")))?;
        let mut config = Self::new(&address)?;

        if let Ok(api_key) = env::var(API_KEY_VAR) {
            config = config.with_api_key(api_key);
        }

        if let Ok(timeout) = env::var(TIMEOUT_VAR) {
            let secs = timeout.trim().parse::<u64>().map_err(|err| {
                ApiError::Config(format!("`{TIMEOUT_VAR}` is not a number of seconds: {err}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Ok(trace) = env::var(TRACE_VAR) {
            config = config.with_trace_requests(parse_flag(&trace));
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key).filter(|key| !key.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_trace_requests(mut self, trace_requests: bool) -> Self {
        self.trace_requests = trace_requests;
        self
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn trace_requests(&self) -> bool {
        self.trace_requests
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("address", &self.address.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<hidden>"))
            .field("timeout", &self.timeout)
            .field("trace_requests", &self.trace_requests)
            .finish()
    }
}
