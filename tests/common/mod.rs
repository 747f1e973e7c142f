#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use tempfile::TempDir;

use tokendokey::auth::store::{ClientConfig, CredentialStore};

/// Unverified JWT whose `exp` is now + `offset_secs`. Signature is a
/// placeholder; the validator never checks it.
pub fn jwt_expiring_in(offset_secs: i64) -> String {
    let exp = Utc::now().timestamp() + offset_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"tester","exp":{exp}}}"#));
    format!("{header}.{payload}.sig")
}

pub fn temp_store() -> (TempDir, CredentialStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = CredentialStore::new(dir.path().to_path_buf());
    (dir, store)
}

/// Public-client config whose endpoints point at a stub issuer.
pub fn stub_config(issuer_uri: &str) -> ClientConfig {
    ClientConfig {
        client_id: "abc".to_string(),
        client_secret: String::new(),
        token_issue_url: format!("{issuer_uri}/token"),
        device_code_url: format!("{issuer_uri}/device"),
    }
}

pub fn confidential_config(issuer_uri: &str) -> ClientConfig {
    ClientConfig {
        client_secret: "s3cret".to_string(),
        ..stub_config(issuer_uri)
    }
}
