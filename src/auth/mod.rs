//! Token acquisition and lifecycle: validity policy, credential storage,
//! and the device-code, refresh, and mTLS direct-grant flows.

pub mod device_code;
pub mod error;
pub mod mtls;
pub mod pkce;
pub mod refresh;
pub mod service;
pub mod store;
pub mod validator;

pub use device_code::{DeviceCodeFlow, DevicePoll, DeviceSession};
pub use error::AuthError;
pub use mtls::MtlsDirectGrantFlow;
pub use pkce::CodeVerifier;
pub use refresh::RefreshFlow;
pub use service::AuthService;
pub use store::{ClientConfig, CredentialStore, TokenPair};
pub use validator::{is_valid, TokenKind};
