//! I/O boundary traits for testability
//!
//! The control-plane client sits behind these traits so the command can
//! be exercised without a network.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, instrument, warn};

use crate::config::Settings;
use crate::domain::{AclToken, BootstrapRequest};
use crate::infrastructure::{InfraError, InfraResult};

/// Path of the bootstrap endpoint, relative to the control-plane address.
pub const BOOTSTRAP_PATH: &str = "/v1/acl/bootstrap";

/// ACL endpoints of the control plane.
pub trait AclClient {
    /// Exchange the (possibly empty) operator secret for a management token.
    ///
    /// Performs exactly one round-trip and never retries.
    fn bootstrap(&self, request: &BootstrapRequest) -> InfraResult<AclToken>;
}

/// Per-invocation overrides applied on top of [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub address: Option<String>,
}

/// Builds configured clients. Fails when the environment cannot reach a control plane.
pub trait ClientFactory: Send + Sync {
    fn client(&self, options: &ClientOptions) -> InfraResult<Box<dyn AclClient>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Creates [`HttpAclClient`]s from settings.
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    settings: Arc<Settings>,
}

impl HttpClientFactory {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl ClientFactory for HttpClientFactory {
    #[instrument(level = "debug", skip(self))]
    fn client(&self, options: &ClientOptions) -> InfraResult<Box<dyn AclClient>> {
        let address = options
            .address
            .as_deref()
            .unwrap_or(self.settings.address.as_str());
        let base_url = parse_address(address)?;

        if self.settings.timeout_secs == 0 {
            return Err(InfraError::client_init("timeout must be greater than zero"));
        }
        if self.settings.tls_skip_verify {
            warn!("TLS certificate verification disabled");
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(self.settings.timeout_secs.min(15)))
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .danger_accept_invalid_certs(self.settings.tls_skip_verify)
            .user_agent(concat!("aclboot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InfraError::client_init(e.to_string()))?;

        debug!("client: address={}", base_url);
        Ok(Box::new(HttpAclClient {
            base_url,
            region: self.settings.region.clone(),
            http,
        }))
    }
}

/// Validate a control-plane address: absolute http(s) URL with a host.
pub fn parse_address(address: &str) -> InfraResult<Url> {
    let address = address.trim();
    if address.is_empty() {
        return Err(InfraError::client_init("no control-plane address configured"));
    }
    let url = Url::parse(address)
        .map_err(|e| InfraError::client_init(format!("invalid address {address:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(InfraError::client_init(format!(
                "invalid address {address:?}: unsupported scheme {other:?}"
            )))
        }
    }
    if url.host_str().is_none() {
        return Err(InfraError::client_init(format!(
            "invalid address {address:?}: missing host"
        )));
    }
    Ok(url)
}

/// Blocking HTTP client for the control plane's ACL API.
#[derive(Debug)]
pub struct HttpAclClient {
    base_url: Url,
    region: Option<String>,
    http: Client,
}

impl HttpAclClient {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl AclClient for HttpAclClient {
    #[instrument(level = "debug", skip(self))]
    fn bootstrap(&self, request: &BootstrapRequest) -> InfraResult<AclToken> {
        let mut builder = self.http.put(self.endpoint(BOOTSTRAP_PATH)).json(request);
        if let Some(region) = &self.region {
            builder = builder.query(&[("region", region)]);
        }

        let response = builder.send().map_err(|e| InfraError::Transport {
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!("bootstrap: status={}", status);
        if !status.is_success() {
            let message = response
                .text()
                .map(|body| body.trim().to_string())
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(InfraError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: AclToken = response.json().map_err(|e| InfraError::Decode {
            message: e.to_string(),
        })?;
        token.validate()?;

        debug!("bootstrap: accessor_id={}", token.accessor_id);
        Ok(token)
    }
}
