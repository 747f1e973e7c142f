use std::path::Path;

use super::error::AuthError;
use super::refresh::parse_token_exchange;
use super::store::{ClientConfig, TokenPair};

/// Resource-owner (password) grant over a mutually authenticated TLS
/// channel. No user interaction; meant for unattended/service contexts.
pub struct MtlsDirectGrantFlow {
    client: reqwest::Client,
}

impl MtlsDirectGrantFlow {
    /// Build a client presenting the given certificate/key pair.
    ///
    /// When `ca_cert_path` is supplied the server is verified against that
    /// trust root only. When it is omitted, server certificate
    /// verification is disabled entirely: the operator is trusting the
    /// endpoint blindly, and a warning is logged to say so.
    pub fn new(
        client_cert_path: &Path,
        client_key_path: &Path,
        ca_cert_path: Option<&Path>,
    ) -> Result<Self, AuthError> {
        let mut pem = std::fs::read(client_cert_path)
            .map_err(|err| AuthError::TlsIdentity(format!("reading client certificate: {err}")))?;
        let key = std::fs::read(client_key_path)
            .map_err(|err| AuthError::TlsIdentity(format!("reading client key: {err}")))?;
        pem.extend_from_slice(&key);
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|err| AuthError::TlsIdentity(err.to_string()))?;

        let mut builder = reqwest::Client::builder().identity(identity);
        match ca_cert_path {
            Some(path) => {
                let ca_pem = std::fs::read(path)
                    .map_err(|err| AuthError::TlsIdentity(format!("reading CA certificate: {err}")))?;
                let ca = reqwest::Certificate::from_pem(&ca_pem)
                    .map_err(|err| AuthError::TlsIdentity(err.to_string()))?;
                builder = builder.add_root_certificate(ca);
            }
            None => {
                tracing::warn!(
                    "no CA certificate supplied; server certificate verification is DISABLED"
                );
                builder = builder.danger_accept_invalid_certs(true);
            }
        }
        let client = builder
            .build()
            .map_err(|err| AuthError::TlsIdentity(err.to_string()))?;
        Ok(Self { client })
    }

    /// Success/failure semantics mirror the refresh exchange.
    pub async fn exchange(&self, config: &ClientConfig) -> Result<TokenPair, AuthError> {
        let mut form = vec![
            ("grant_type", "password"),
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
