//! tokendokey: local OAuth/OIDC client credential manager.
//!
//! Acquires, validates, and refreshes access tokens on behalf of named
//! client profiles, persisting secrets to one directory per client under
//! `~/.tokendokey`. Three acquisition flows are supported: the
//! PKCE-protected Device Authorization Grant, the Refresh-Token grant, and
//! a mutual-TLS direct (password) grant for unattended contexts.
//!
//! Tokens are treated as opaque bearers on disk; validity is derived at
//! read time from the unverified JWT `exp` claim with a per-kind safety
//! margin. Nothing here checks signatures.

pub mod auth;
pub mod cli;
