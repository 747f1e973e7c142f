use std::path::Path;

use super::error::AuthError;
use super::mtls::MtlsDirectGrantFlow;
use super::refresh::RefreshFlow;
use super::store::{ClientConfig, CredentialStore, TokenPair};
use super::validator::{is_valid, TokenKind};

/// Per-command orchestration over the cached tokens and the flows.
///
/// Decides, for each entry point, whether the cached access token can be
/// reused, whether the refresh token can be spent, or whether a full
/// acquisition flow is needed. All printing and prompting belongs to the
/// caller; this only returns typed results.
pub struct AuthService {
    store: CredentialStore,
}

impl AuthService {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// `get-token`: cached access token when valid (and not forced), else
    /// one refresh exchange. Never falls back to an acquisition flow on
    /// its own; device and mTLS logins need credentials this entry point
    /// does not have.
    pub async fn get_token(&self, client: &str, force: bool) -> Result<String, AuthError> {
        let config = self.store.load_config(client)?;
        let tokens = self.store.load_tokens(client)?;

        if !force && is_valid(&tokens.access_token, TokenKind::Access) {
            tracing::debug!(client, "cached access token still valid");
            return Ok(tokens.access_token);
        }
        if !is_valid(&tokens.refresh_token, TokenKind::Refresh) {
            return Err(AuthError::NotLoggedIn);
        }
        self.refresh(client, &config, &tokens.refresh_token).await
    }

    /// `mtls-token`: cached access token, else refresh, else the direct
    /// grant, which runs fully automatically with no human step.
    pub async fn mtls_token(
        &self,
        client: &str,
        client_cert_path: &Path,
        client_key_path: &Path,
        ca_cert_path: Option<&Path>,
    ) -> Result<String, AuthError> {
        let config = self.store.load_config(client)?;
        let tokens = self.store.load_tokens(client)?;

        if is_valid(&tokens.access_token, TokenKind::Access) {
            return Ok(tokens.access_token);
        }
        if is_valid(&tokens.refresh_token, TokenKind::Refresh) {
            return self.refresh(client, &config, &tokens.refresh_token).await;
        }

        tracing::info!(client, "no usable cached tokens, running mTLS direct grant");
        let flow = MtlsDirectGrantFlow::new(client_cert_path, client_key_path, ca_cert_path)?;
        let pair = flow.exchange(&config).await?;
        self.store.save_tokens(client, &pair)?;
        Ok(pair.access_token)
    }

    /// Persist the pair a completed login produced and hand back the
    /// access token.
    pub fn complete_login(&self, client: &str, pair: &TokenPair) -> Result<String, AuthError> {
        self.store.save_tokens(client, pair)?;
        Ok(pair.access_token.clone())
    }

    async fn refresh(
        &self,
        client: &str,
        config: &ClientConfig,
        refresh_token: &str,
    ) -> Result<String, AuthError> {
        tracing::debug!(client, "exchanging refresh token");
        let pair = RefreshFlow::new().exchange(config, refresh_token).await?;
        self.store.save_tokens(client, &pair)?;
        Ok(pair.access_token)
    }
}
