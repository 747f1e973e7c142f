use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::AuthError;

const CONFIG_FILE: &str = "config.json";
const ACCESS_TOKEN_FILE: &str = "access_token.txt";
const REFRESH_TOKEN_FILE: &str = "refresh_token.txt";

/// One OAuth client registration, as stored in `config.json`.
///
/// Created once by `init`, read by every flow, never mutated by the flows.
/// An empty `client_secret` means a public client; `device_code_url` is
/// only required by the device-code flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    pub token_issue_url: String,
    #[serde(rename = "device_authorization_endpoint", default)]
    pub device_code_url: String,
}

/// The two persisted token artifacts. Either member may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// File-backed credential storage, one directory per client name.
///
/// Layout under the root (default `~/.tokendokey`):
///
/// ```text
/// <root>/<client>/config.json
/// <root>/<client>/access_token.txt
/// <root>/<client>/refresh_token.txt
/// ```
///
/// A client directory is always in one of three states: absent, present
/// with empty token files (initialized, not logged in), or present with
/// token material. Writes are sequential per file with no cross-file
/// atomicity; a crash between the two token writes can leave a mixed pair.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    root: PathBuf,
}

impl CredentialStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store rooted at `~/.tokendokey`.
    pub fn new_default() -> Self {
        let root = directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".tokendokey"))
            .unwrap_or_else(|| PathBuf::from(".tokendokey"));
        Self { root }
    }

    pub fn client_dir(&self, client: &str) -> PathBuf {
        self.root.join(client)
    }

    /// Write the config and both (empty) token files, creating the client
    /// directory if needed. Idempotent; re-running replaces the config and
    /// resets any stored tokens.
    pub fn save_config(&self, client: &str, config: &ClientConfig) -> Result<(), AuthError> {
        let dir = self.client_dir(client);
        fs::create_dir_all(&dir)?;
        let serialized = serde_json::to_string_pretty(config)?;
        fs::write(dir.join(CONFIG_FILE), serialized)?;
        // Empty token files mark the directory as initialized-no-tokens.
        self.save_tokens(client, &TokenPair::default())
    }

    pub fn load_config(&self, client: &str) -> Result<ClientConfig, AuthError> {
        let path = self.client_dir(client).join(CONFIG_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::ConfigNotFound(client.to_string()));
            }
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        serde_json::from_str(&raw).map_err(|err| AuthError::ConfigMalformed(err.to_string()))
    }

    /// Missing token files read as empty strings, not errors.
    pub fn load_tokens(&self, client: &str) -> Result<TokenPair, AuthError> {
        let dir = self.client_dir(client);
        Ok(TokenPair {
            access_token: read_or_empty(&dir.join(ACCESS_TOKEN_FILE))?,
            refresh_token: read_or_empty(&dir.join(REFRESH_TOKEN_FILE))?,
        })
    }

    /// Overwrite both artifacts: access token first, then refresh token.
    pub fn save_tokens(&self, client: &str, tokens: &TokenPair) -> Result<(), AuthError> {
        let dir = self.client_dir(client);
        fs::create_dir_all(&dir)?;
        write_restricted(&dir.join(ACCESS_TOKEN_FILE), &tokens.access_token)?;
        write_restricted(&dir.join(REFRESH_TOKEN_FILE), &tokens.refresh_token)?;
        Ok(())
    }

    /// Logout: reset both token files to empty, keeping the client in the
    /// initialized-no-tokens state rather than deleting the files.
    pub fn clear_tokens(&self, client: &str) -> Result<(), AuthError> {
        self.save_tokens(client, &TokenPair::default())
    }

    pub fn delete_client(&self, client: &str) -> Result<(), AuthError> {
        let dir = self.client_dir(client);
        if !dir.exists() {
            return Err(AuthError::ConfigNotFound(client.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    /// Names of all initialized client directories, sorted.
    pub fn list_clients(&self) -> Result<Vec<String>, AuthError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let mut clients = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| AuthError::Io(err.to_string()))?;
            if entry.path().is_dir() {
                clients.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        clients.sort();
        Ok(clients)
    }
}

fn read_or_empty(path: &Path) -> Result<String, AuthError> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(data),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(AuthError::Io(err.to_string())),
    }
}

fn write_restricted(path: &Path, contents: &str) -> Result<(), AuthError> {
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
