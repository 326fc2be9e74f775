/// InfraControl HTTP client.
///
/// Synchronous `ureq` transport for the status endpoint and the JSON
/// mutation endpoints. One client is built per process from the resolved
/// [`BackendConfig`] and shared by the poll loop and the command client.
use std::time::Duration;

use crate::config::schema::BackendConfig;
use crate::model::StatusSnapshot;

use super::{Backend, FetchError, MutationRequest, error_message};

/// Path of the status endpoint, relative to the backend base URL.
pub const STATUS_PATH: &str = "/api/status";

/// `ureq`-backed [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        // "localhost" may resolve to ::1 first and stall when the backend
        // only binds IPv4.
        let base_url = base_url
            .trim_end_matches('/')
            .replace("://localhost", "://127.0.0.1");
        Self { base_url, timeout }
    }

    /// Build a client from the resolved config.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    fn fetch_status(&self) -> Result<StatusSnapshot, FetchError> {
        let resp = ureq::get(&self.url(STATUS_PATH))
            .timeout(self.timeout)
            .call()
            .map_err(map_ureq_error)?;

        resp.into_json::<StatusSnapshot>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn send(&self, request: &MutationRequest) -> Result<(), FetchError> {
        ureq::request(request.method.as_str(), &self.url(request.path))
            .timeout(self.timeout)
            .send_json(&request.body)
            .map_err(map_ureq_error)?;
        Ok(())
    }
}

/// Split `ureq` failures into HTTP-level and transport-level errors.
fn map_ureq_error(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::Status(status, resp) => {
            let message = resp
                .into_string()
                .ok()
                .and_then(|body| error_message(&body))
                .unwrap_or_else(|| format!("request failed with HTTP {status}"));
            FetchError::Http { status, message }
        }
        ureq::Error::Transport(transport) => FetchError::Network(transport.to_string()),
    }
}
