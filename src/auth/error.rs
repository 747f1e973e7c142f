use thiserror::Error;

/// Normalized errors for every credential operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No configuration found for client '{0}'. Run `tokendokey init -c {0}` first")]
    ConfigNotFound(String),
    #[error("Malformed configuration: {0}")]
    ConfigMalformed(String),
    #[error("Not logged in: no usable refresh token. Run `tokendokey login` to authorize")]
    NotLoggedIn,
    #[error("Issuer rejected the request (status {status}): {message}")]
    Issuer { status: u16, message: String },
    #[error("TLS identity error: {0}")]
    TlsIdentity(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
