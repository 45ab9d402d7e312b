//! Test support: logging setup and in-memory doubles for the I/O traits

use std::env;
use std::sync::{Arc, Mutex, MutexGuard, Once};

use chrono::{TimeZone, Utc};
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::cli::output::Ui;
use crate::domain::{AclToken, BootstrapRequest, TokenType};
use crate::infrastructure::traits::{AclClient, ClientFactory, ClientOptions};
use crate::infrastructure::{InfraError, InfraResult};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }

    if env::var("RUST_LOG").is_err() {
        debug!("RUST_LOG unset, test logging at debug");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Token as returned by a fresh bootstrap.
pub fn management_token() -> AclToken {
    AclToken {
        accessor_id: "abc123".into(),
        secret_id: "xyz789".into(),
        name: String::new(),
        token_type: TokenType::Management,
        global: true,
        policies: vec![],
        create_time: Utc
            .with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default(),
        create_index: 5,
        modify_index: 5,
    }
}

/// [`Ui`] capturing output and errors in memory.
#[derive(Debug, Default)]
pub struct BufferUi {
    out: Mutex<Vec<String>>,
    err: Mutex<Vec<String>>,
}

impl BufferUi {
    pub fn output_text(&self) -> String {
        lock(&self.out).join("\n")
    }

    pub fn error_text(&self) -> String {
        lock(&self.err).join("\n")
    }
}

impl Ui for BufferUi {
    fn output(&self, msg: &str) {
        lock(&self.out).push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        lock(&self.err).push(msg.to_string());
    }
}

/// Canned result of a bootstrap call.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Token(AclToken),
    Api { status: u16, message: String },
    Transport(String),
}

impl StubResponse {
    fn to_result(&self) -> InfraResult<AclToken> {
        match self {
            StubResponse::Token(token) => Ok(token.clone()),
            StubResponse::Api { status, message } => Err(InfraError::Api {
                status: *status,
                message: message.clone(),
            }),
            StubResponse::Transport(message) => Err(InfraError::Transport {
                message: message.clone(),
            }),
        }
    }
}

/// [`ClientFactory`] handing out clients that record every call.
#[derive(Debug)]
pub struct RecordingClientFactory {
    response: StubResponse,
    init_failure: Option<String>,
    options: Arc<Mutex<Vec<ClientOptions>>>,
    requests: Arc<Mutex<Vec<BootstrapRequest>>>,
}

impl RecordingClientFactory {
    pub fn new(response: StubResponse) -> Self {
        Self {
            response,
            init_failure: None,
            options: Arc::default(),
            requests: Arc::default(),
        }
    }

    pub fn returning(token: AclToken) -> Self {
        Self::new(StubResponse::Token(token))
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::new(StubResponse::Api {
            status,
            message: message.into(),
        })
    }

    /// Factory whose client construction fails.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            init_failure: Some(message.into()),
            ..Self::returning(management_token())
        }
    }

    /// Number of clients requested.
    pub fn client_requests(&self) -> usize {
        lock(&self.options).len()
    }

    /// Options passed to the most recent client request.
    pub fn last_options(&self) -> Option<ClientOptions> {
        lock(&self.options).last().cloned()
    }

    /// Number of bootstrap round-trips across all clients.
    pub fn bootstrap_calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<BootstrapRequest> {
        lock(&self.requests).clone()
    }
}

impl ClientFactory for RecordingClientFactory {
    fn client(&self, options: &ClientOptions) -> InfraResult<Box<dyn AclClient>> {
        lock(&self.options).push(options.clone());
        if let Some(message) = &self.init_failure {
            return Err(InfraError::client_init(message.clone()));
        }
        Ok(Box::new(RecordingClient {
            response: self.response.clone(),
            requests: Arc::clone(&self.requests),
        }))
    }
}

struct RecordingClient {
    response: StubResponse,
    requests: Arc<Mutex<Vec<BootstrapRequest>>>,
}

impl AclClient for RecordingClient {
    fn bootstrap(&self, request: &BootstrapRequest) -> InfraResult<AclToken> {
        lock(&self.requests).push(request.clone());
        self.response.to_result()
    }
}
