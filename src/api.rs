// API client module: a small blocking HTTP client for the vending machine
// service. Every action maps to exactly one request; nothing is retried.
// Failures are returned as values so the menu loop can report them and
// carry on.

use crate::config::RuntimeConfig;
use crate::error::{HarnessError, Result};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode, Url, Version};

/// Float used by Initialize when the operator just presses Enter.
pub const DEFAULT_FLOAT_COINS: &str =
    "TWOPOUND:5,ONEPOUND:10,FIFTY:10,TWENTY:10,TEN:20,FIVE:20,TWO:20,ONE:20";

/// Status text reported when the service could not be reached.
pub const STATUS_TIMEOUT: &str = "TIMEOUT";
/// Status text reported when the service answered with anything but 200.
pub const STATUS_ERROR: &str = "ERROR";

/// One operation of the vending machine API. Variants that take operator
/// input carry it as the path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Status,
    Initialize(String),
    Products,
    Deposit(String),
    Vend(String),
    Refund,
    FloatValue,
    CoinBucket,
}

impl Action {
    /// Initialize with the operator's coins, or the default float when
    /// the input is blank.
    pub fn initialize(coins: &str) -> Self {
        let coins = coins.trim();
        if coins.is_empty() {
            Action::Initialize(DEFAULT_FLOAT_COINS.to_string())
        } else {
            Action::Initialize(coins.to_string())
        }
    }

    /// Endpoint name as it appears in the first path segment.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Action::Status => "/status",
            Action::Initialize(_) => "/init",
            Action::Products => "/products",
            Action::Deposit(_) => "/deposit",
            Action::Vend(_) => "/vend",
            Action::Refund => "/refund",
            Action::FloatValue => "/floatvalue",
            Action::CoinBucket => "/coinbucket",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Action::Initialize(_) | Action::Deposit(_) => Method::POST,
            Action::Vend(_) => Method::PUT,
            _ => Method::GET,
        }
    }

    fn input(&self) -> Option<&str> {
        match self {
            Action::Initialize(s) | Action::Deposit(s) | Action::Vend(s) => Some(s.trim()),
            _ => None,
        }
    }

    pub fn request(&self) -> ActionRequest {
        let input = self.input().map(str::to_string);
        let path = match &input {
            Some(param) => format!("{}/{}", self.endpoint(), param),
            None => self.endpoint().to_string(),
        };
        ActionRequest {
            method: self.method(),
            endpoint: self.endpoint(),
            path,
            interactive_input: input,
        }
    }
}

/// Method and path of a single call, relative to the API root. `path` is
/// the parameter as typed; the URL sent carries it as one encoded segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub method: Method,
    pub endpoint: &'static str,
    pub path: String,
    pub interactive_input: Option<String>,
}

/// Outcome of one call. A transport failure has no status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Completed {
        version: Version,
        status: StatusCode,
        body: String,
    },
    TransportFailed,
}

impl ActionResult {
    pub fn transport_failed(&self) -> bool {
        matches!(self, ActionResult::TransportFailed)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ActionResult::Completed { status, .. } => Some(status.as_u16()),
            ActionResult::TransportFailed => None,
        }
    }

    /// Only a plain 200 counts as success.
    pub fn is_ok(&self) -> bool {
        self.status_code() == Some(StatusCode::OK.as_u16())
    }

    pub fn body(&self) -> &str {
        match self {
            ActionResult::Completed { body, .. } => body,
            ActionResult::TransportFailed => "",
        }
    }

    /// e.g. `HTTP/1.1 200 OK`
    pub fn status_line(&self) -> Option<String> {
        match self {
            ActionResult::Completed {
                version, status, ..
            } => Some(format!("{:?} {}", version, status)),
            ActionResult::TransportFailed => None,
        }
    }

    /// Collapse a Status call into the text callers branch on: the body on
    /// 200, `TIMEOUT` when unreachable, `ERROR` otherwise.
    pub fn into_status_text(self) -> String {
        match self {
            ActionResult::Completed { status, body, .. } if status == StatusCode::OK => body,
            ActionResult::Completed { .. } => STATUS_ERROR.to_string(),
            ActionResult::TransportFailed => STATUS_TIMEOUT.to_string(),
        }
    }
}

/// Blocking client bound to one service root. The connect and overall
/// request timeouts both come from `RuntimeConfig::timeout_secs`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Client for `http://localhost:<port>/vendingmachine/v1`.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url(), config)
    }

    /// Client for an explicit API root, keeping the configured timeouts.
    pub fn with_base_url(base_url: &str, config: &RuntimeConfig) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HarnessError::BaseUrl(format!("{}: {}", base_url, e)))?;
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()?;
        Ok(ApiClient { client, base_url })
    }

    /// Full URL for a request. The endpoint and the operator's parameter
    /// are pushed as separate segments, so `/`, `?`, `#` and `%` in the
    /// parameter are percent-encoded rather than reshaping the URL.
    pub fn url_for(&self, request: &ActionRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(request.endpoint.trim_start_matches('/'));
            if let Some(param) = &request.interactive_input {
                segments.push(param);
            }
        }
        url
    }

    /// Send the action's request once and read the whole body.
    pub fn execute(&self, action: &Action) -> ActionResult {
        let request = action.request();
        let url = self.url_for(&request);
        log::debug!("{} {} -> {}", request.method, request.path, url);

        let response = match self.client.request(request.method, url.clone()).send() {
            Ok(res) => res,
            Err(e) => {
                log::warn!("request to {} failed: {}", url, e);
                return ActionResult::TransportFailed;
            }
        };

        let version = response.version();
        let status = response.status();
        match response.text() {
            Ok(body) => {
                log::debug!("{} answered {}", url, status);
                ActionResult::Completed {
                    version,
                    status,
                    body,
                }
            }
            Err(e) => {
                log::warn!("reading response from {} failed: {}", url, e);
                ActionResult::TransportFailed
            }
        }
    }
}
