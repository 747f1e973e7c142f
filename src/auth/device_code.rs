use serde::Deserialize;

use super::error::AuthError;
use super::pkce::CodeVerifier;
use super::store::{ClientConfig, TokenPair};

/// Fallback poll period when the issuer does not send an `interval`.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// One in-flight device authorization attempt.
///
/// Carries the PKCE verifier bound to this attempt; the session is dropped
/// on completion or abandonment and the verifier with it.
#[derive(Debug)]
pub struct DeviceSession {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub interval_secs: u64,
    verifier: CodeVerifier,
}

impl DeviceSession {
    /// What the operator should be shown: the complete URI alone when the
    /// issuer provides one, else the plain URI plus the user code.
    pub fn operator_prompt(&self) -> (&str, Option<&str>) {
        match &self.verification_uri_complete {
            Some(uri) => (uri.as_str(), None),
            None => (self.verification_uri.as_str(), Some(self.user_code.as_str())),
        }
    }
}

/// Outcome of a single poll step.
#[derive(Debug)]
pub enum DevicePoll {
    /// User authorized; the pair is ready to persist.
    Authorized(TokenPair),
    /// `authorization_pending`: keep polling after `interval_secs`.
    Pending { interval_secs: u64 },
    /// `slow_down`: keep polling at the widened interval.
    SlowDown { interval_secs: u64 },
    /// `access_denied`: the user rejected the request.
    Denied,
    /// `expired_token`: the device code lapsed before authorization.
    Expired,
}

/// PKCE-protected OAuth Device Authorization Grant.
///
/// `start` obtains the device/user code pair; `poll` performs one token
/// request and reports a typed outcome. The caller owns the sleep between
/// polls, so the loop can be driven synchronously in tests.
pub struct DeviceCodeFlow {
    client: reqwest::Client,
}

impl DeviceCodeFlow {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Request a device/user code pair from the device authorization
    /// endpoint. A response carrying an `error` field fails immediately;
    /// polling never starts for it.
    pub async fn start(
        &self,
        config: &ClientConfig,
        offline_token: bool,
    ) -> Result<DeviceSession, AuthError> {
        let verifier = CodeVerifier::generate();
        let challenge = verifier.challenge();

        let mut form = vec![
            ("client_id", config.client_id.as_str()),
            ("code_challenge", challenge.as_str()),
            ("code_challenge_method", "S256"),
        ];
        if offline_token {
            form.push(("scope", "offline_access"));
        }

        let resp = self
            .client
            .post(&config.device_code_url)
            .form(&form)
            .send()
            .await?;
        let status = resp.status();
        let payload: DeviceAuthorizationResponse = resp.json().await?;

        if let Some(error) = payload.error {
            return Err(AuthError::Issuer {
                status: status.as_u16(),
                message: error,
            });
        }
        let device_code = payload
            .device_code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| {
                AuthError::InvalidResponse("device authorization response missing device_code".to_string())
            })?;

        tracing::debug!(interval = ?payload.interval, "device authorization granted");
        Ok(DeviceSession {
            device_code,
            user_code: payload.user_code.unwrap_or_default(),
            verification_uri: payload.verification_uri.unwrap_or_default(),
            verification_uri_complete: payload.verification_uri_complete,
            // A zero interval would make the poll loop hammer the token
            // endpoint; treat it like an absent interval.
            interval_secs: payload
                .interval
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            verifier,
        })
    }

    /// One poll of the token endpoint for this session.
    ///
    /// HTTP 200 with a non-empty `access_token` is terminal success. The
    /// standard device-grant error codes map to their poll outcomes; any
    /// other issuer error is terminal.
    pub async fn poll(
        &self,
        config: &ClientConfig,
        session: &DeviceSession,
    ) -> Result<DevicePoll, AuthError> {
        let resp = self
            .client
            .post(&config.token_issue_url)
            .form(&[
                ("grant_type", DEVICE_CODE_GRANT),
                ("device_code", session.device_code.as_str()),
                ("client_id", config.client_id.as_str()),
                ("code_verifier", session.verifier.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        let payload: TokenResponse = resp.json().await?;

        if status.is_success() {
            if let Some(access_token) = payload.access_token.filter(|t| !t.is_empty()) {
                return Ok(DevicePoll::Authorized(TokenPair {
                    access_token,
                    refresh_token: payload.refresh_token.unwrap_or_default(),
                }));
            }
        }
        match payload.error.as_deref() {
            Some("authorization_pending") => Ok(DevicePoll::Pending {
                interval_secs: session.interval_secs,
            }),
            Some("slow_down") => Ok(DevicePoll::SlowDown {
                interval_secs: session.interval_secs + 2,
            }),
            Some("expired_token") => Ok(DevicePoll::Expired),
            Some("access_denied") => Ok(DevicePoll::Denied),
            Some(other) => Err(AuthError::Issuer {
                status: status.as_u16(),
                message: other.to_string(),
            }),
            None => Err(AuthError::InvalidResponse(
                "token response missing both access_token and error".to_string(),
            )),
        }
    }
}

impl Default for DeviceCodeFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct DeviceAuthorizationResponse {
    device_code: Option<String>,
    user_code: Option<String>,
    verification_uri: Option<String>,
    verification_uri_complete: Option<String>,
    interval: Option<u64>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
}
