use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Raw entropy per verifier, before base64url encoding.
const VERIFIER_BYTES: usize = 43;

/// PKCE code verifier for a single login attempt.
///
/// Holds base64url (no padding) of 43 cryptographically random bytes.
/// Never persisted and never reused across attempts; a fresh verifier is
/// generated every time the device flow starts.
#[derive(Debug, Clone)]
pub struct CodeVerifier(String);

impl CodeVerifier {
    pub fn generate() -> Self {
        let mut bytes = [0u8; VERIFIER_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Derive the S256 code challenge: base64url(SHA-256(verifier)).
    pub fn challenge(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    fn from_raw(value: &str) -> Self {
        Self(value.to_string())
    }
}
