//! Blocking HTTP transport for the API reader.

use std::time::Duration;

use serde_json::{json, Value};

use mounter_core::Locale;
use mounter_reader::{api_err, ApiClient, ApiCredentials, ReaderError};

const TIMEOUT: Duration = Duration::from_secs(30);

/// An [`ApiClient`] authenticated with an API token.
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl HttpClient {
    /// Exchange the credentials for a token (`POST <uri>/tokens.json`).
    pub fn connect(credentials: &ApiCredentials) -> Result<Self, ReaderError> {
        let agent = ureq::AgentBuilder::new().timeout(TIMEOUT).build();
        let base_url = credentials.base_url();

        let response: Value = agent
            .post(&format!("{base_url}/tokens.json"))
            .send_json(json!({ "email": credentials.email, "password": credentials.password }))
            .map_err(|e| transport_err("tokens", e))?
            .into_json()
            .map_err(|e| api_err("tokens", e.to_string()))?;
        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| api_err("tokens", "no token in response"))?
            .to_string();

        tracing::debug!("authenticated against {base_url}");
        Ok(Self {
            agent,
            base_url,
            token,
        })
    }
}

impl ApiClient for HttpClient {
    fn get(&self, resource: &str, locale: Option<&Locale>) -> Result<Value, ReaderError> {
        let mut request = self
            .agent
            .get(&format!("{}/{resource}.json", self.base_url))
            .query("auth_token", &self.token);
        if let Some(locale) = locale {
            request = request.query("locale", locale.as_str());
        }
        tracing::debug!("GET {resource} ({})", locale.map(Locale::as_str).unwrap_or("default"));

        request
            .call()
            .map_err(|e| transport_err(resource, e))?
            .into_json()
            .map_err(|e| api_err(resource, e.to_string()))
    }
}

fn transport_err(resource: &str, err: ureq::Error) -> ReaderError {
    match err {
        ureq::Error::Status(code, response) => {
            api_err(resource, format!("HTTP {code} {}", response.status_text()))
        }
        ureq::Error::Transport(transport) => api_err(resource, transport.to_string()),
    }
}
