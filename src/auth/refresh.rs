use serde::Deserialize;

use super::error::AuthError;
use super::store::{ClientConfig, TokenPair};

/// Refresh-token grant: exchange a valid refresh token for a new pair.
pub struct RefreshFlow {
    client: reqwest::Client,
}

impl RefreshFlow {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Success requires HTTP 200 and a non-empty `access_token`; anything
    /// else is an issuer error carrying the status and body for
    /// diagnostics. The returned `refresh_token` may be empty when the
    /// issuer does not rotate refresh tokens.
    pub async fn exchange(
        &self,
        config: &ClientConfig,
        refresh_token: &str,
    ) -> Result<TokenPair, AuthError> {
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ];
        if !config.client_secret.is_empty() {
            form.push(("client_secret", config.client_secret.as_str()));
        }

        let resp = self
            .client
            .post(&config.token_issue_url)
            .form(&form)
            .send()
            .await?;
        parse_token_exchange(resp).await
    }
}

impl Default for RefreshFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared success rule for the refresh and direct-grant exchanges.
pub(super) async fn parse_token_exchange(resp: reqwest::Response) -> Result<TokenPair, AuthError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(AuthError::Issuer {
            status: status.as_u16(),
            message: body,
        });
    }
    let payload: ExchangeResponse = serde_json::from_str(&body)
        .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
    match payload.access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => Ok(TokenPair {
            access_token,
            refresh_token: payload.refresh_token.unwrap_or_default(),
        }),
        None => Err(AuthError::Issuer {
            status: status.as_u16(),
            message: payload
                .error
                .unwrap_or_else(|| "token response missing access_token".to_string()),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
}
