//! Zoho OAuth device-code and refresh-token handling.
//!
//! Lifecycle of one [`TokenAuthority`]:
//!
//! 1. No token: the caller runs [`TokenAuthority::begin_device_authorization`],
//!    shows the user code and verification URL, and installs the device code
//!    with [`TokenAuthority::use_device_code`].
//! 2. First [`TokenAuthority::get_access_token`] exchanges the device code for
//!    an access token and a refresh token.
//! 3. From then on an expired access token is only ever renewed with the
//!    refresh token, which is kept for the authority's lifetime.
//!
//! Exchanges are serialized behind an async mutex, so concurrent callers that
//! all see an expired token trigger a single exchange.

use crate::config::Credentials;
use crate::error::{Result, SheetError};
use crate::zoho::request::{ApiRequest, FormParams};
use crate::zoho::transport::{RawResponse, Transport};
use crate::zoho::types::{DeviceCodeResponse, TokenResponse};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

const ZOHO_SHEET_SCOPE: &str = "ZohoSheet.dataAPI.READ,ZohoSheet.dataAPI.UPDATE";

/// Tokens are treated as expired this long before Zoho's stated expiry.
const EXPIRY_SAFETY_MARGIN_SECS: i64 = 60;

/// Provides access tokens for API calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// A token valid at the time of return.
    async fn access_token(&self) -> Result<String>;

    fn refresh_token(&self) -> Option<String>;
}

/// A fixed, externally managed access token.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        None
    }
}

/// What the end user needs to approve this device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    /// Seconds until the device code expires.
    pub expires_in: u64,
    /// Minimum seconds between exchange attempts.
    pub interval: u64,
}

impl From<DeviceCodeResponse> for DeviceAuthorization {
    fn from(resp: DeviceCodeResponse) -> Self {
        DeviceAuthorization {
            device_code: resp.device_code,
            user_code: resp.user_code,
            verification_url: resp.verification_url,
            expires_in: resp.expires_in,
            interval: resp.interval,
        }
    }
}

#[derive(Debug, Default)]
struct TokenState {
    access_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    refresh_token: Option<String>,
    device_code: Option<String>,
}

impl TokenState {
    fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.access_token, self.expires_at) {
            (Some(token), Some(expires_at)) if !token.is_empty() && now < expires_at => {
                Some(token.as_str())
            }
            _ => None,
        }
    }
}

pub struct TokenAuthority {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    state: RwLock<TokenState>,
    exchange: Mutex<()>,
}

impl TokenAuthority {
    pub fn new(credentials: Credentials, transport: Arc<dyn Transport>) -> Self {
        let state = TokenState {
            access_token: None,
            expires_at: None,
            refresh_token: non_empty(credentials.refresh_token.as_deref()),
            device_code: non_empty(credentials.device_code.as_deref()),
        };

        Self {
            credentials,
            transport,
            state: RwLock::new(state),
            exchange: Mutex::new(()),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    fn read(&self) -> RwLockReadGuard<'_, TokenState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TokenState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_token(&self) -> Option<String> {
        self.read().valid_token(Utc::now()).map(str::to_string)
    }

    /// Return a valid access token, exchanging the refresh token or device
    /// code when the cached one is missing or expired.
    pub async fn get_access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            debug!("Using cached Zoho access token");
            return Ok(token);
        }

        let _exchange = self.exchange.lock().await;

        // Another caller may have finished an exchange while we waited.
        if let Some(token) = self.cached_token() {
            debug!("Using access token obtained by a concurrent exchange");
            return Ok(token);
        }

        let (refresh_token, device_code) = {
            let state = self.read();
            (state.refresh_token.clone(), state.device_code.clone())
        };

        match (refresh_token, device_code) {
            (Some(refresh_token), _) => self.refresh_access_token(&refresh_token).await,
            (None, Some(device_code)) => self.exchange_device_code(&device_code).await,
            (None, None) => Err(SheetError::AuthConfiguration(
                "No device code or refresh token found. Run the device authorization first."
                    .to_string(),
            )),
        }
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    /// Install the device code the user is approving. The next
    /// `get_access_token` exchanges it unless a refresh token is already held.
    pub fn use_device_code(&self, device_code: impl Into<String>) {
        self.write().device_code = Some(device_code.into());
    }

    /// Start the device flow. Token state is left untouched.
    #[instrument(name = "Requesting Zoho device code", skip_all)]
    pub async fn begin_device_authorization(&self) -> Result<DeviceAuthorization> {
        let params = FormParams::new()
            .text("client_id", self.credentials.client_id.as_str())
            .text("scope", ZOHO_SHEET_SCOPE)
            .text("grant_type", "device_request")
            .text("access_type", "offline");

        let response = self
            .post_form(&self.credentials.device_code_url(), params)
            .await?;
        let device: DeviceCodeResponse =
            serde_json::from_str(&response.body).map_err(|_| exchange_error(&response))?;

        debug!(
            user_code = %device.user_code,
            verification_url = %device.verification_url,
            expires_in = device.expires_in,
            interval = device.interval,
            "Device code obtained"
        );

        Ok(device.into())
    }

    #[instrument(name = "Exchanging Zoho device code", skip_all)]
    async fn exchange_device_code(&self, device_code: &str) -> Result<String> {
        let params = FormParams::new()
            .text("client_id", self.credentials.client_id.as_str())
            .text("client_secret", self.credentials.client_secret.as_str())
            .text("grant_type", "device_token")
            .text("code", device_code);

        let response = self
            .post_form(&self.credentials.device_token_url(), params)
            .await?;
        let (access_token, expires_at, token) = parse_token(&response)?;
        let refresh_token =
            non_empty(token.refresh_token.as_deref()).ok_or_else(|| exchange_error(&response))?;

        let mut state = self.write();
        state.access_token = Some(access_token.clone());
        state.expires_at = Some(expires_at);
        state.refresh_token = Some(refresh_token);
        info!("Captured Zoho refresh token");

        Ok(access_token)
    }

    #[instrument(name = "Refreshing Zoho access token", skip_all)]
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let params = FormParams::new()
            .text("client_id", self.credentials.client_id.as_str())
            .text("client_secret", self.credentials.client_secret.as_str())
            .text("grant_type", "refresh_token")
            .text("refresh_token", refresh_token);

        let response = self
            .post_form(&self.credentials.token_url(), params)
            .await?;
        let (access_token, expires_at, _) = parse_token(&response)?;

        // Zoho does not rotate refresh tokens on this grant.
        let mut state = self.write();
        state.access_token = Some(access_token.clone());
        state.expires_at = Some(expires_at);
        debug!("Token refresh successful");

        Ok(access_token)
    }

    async fn post_form(&self, url: &str, params: FormParams) -> Result<RawResponse> {
        let request = ApiRequest::token_exchange(url, params)?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(exchange_error(&response));
        }
        Ok(response)
    }
}

#[async_trait]
impl TokenSource for TokenAuthority {
    async fn access_token(&self) -> Result<String> {
        self.get_access_token().await
    }

    fn refresh_token(&self) -> Option<String> {
        self.get_refresh_token()
    }
}

fn parse_token(response: &RawResponse) -> Result<(String, DateTime<Utc>, TokenResponse)> {
    let token: TokenResponse =
        serde_json::from_str(&response.body).map_err(|_| exchange_error(response))?;

    if token.error.is_some() {
        return Err(exchange_error(response));
    }

    let access_token =
        non_empty(token.access_token.as_deref()).ok_or_else(|| exchange_error(response))?;
    let expires_at = token
        .expires_in
        .and_then(expiry_from)
        .ok_or_else(|| exchange_error(response))?;

    Ok((access_token, expires_at, token))
}

fn exchange_error(response: &RawResponse) -> SheetError {
    SheetError::AuthExchange {
        status: response.status,
        body: response.body.clone(),
    }
}

/// `None` when `expires_in` does not fit a timestamp.
fn expiry_from(expires_in: i64) -> Option<DateTime<Utc>> {
    let lifetime = expires_in.checked_sub(EXPIRY_SAFETY_MARGIN_SECS)?;
    Utc::now().checked_add_signed(Duration::try_seconds(lifetime)?)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
