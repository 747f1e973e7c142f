//! Command-line surface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Local OAuth/OIDC client credential manager.
#[derive(Parser, Debug)]
#[command(name = "tokendokey", version, about = "Acquire, validate, and refresh OAuth tokens for named client profiles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new OAuth client configuration
    Init(InitArgs),
    /// Print a valid access token, refreshing it when needed
    GetToken(GetTokenArgs),
    /// Authorize via the device-code flow
    Login(LoginArgs),
    /// Discard the stored tokens for a client
    Logout(ClientArgs),
    /// Obtain an access token via the mTLS direct-grant flow
    MtlsToken(MtlsTokenArgs),
    /// List clients, or show one client's settings
    List(ListArgs),
    /// Delete a client's configuration directory
    Delete(ClientArgs),
}

#[derive(Parser, Debug)]
pub struct ClientArgs {
    /// Client name for the OAuth configuration
    #[arg(short, long)]
    pub client: String,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Client name for the OAuth configuration
    #[arg(short, long)]
    pub client: String,
}

#[derive(Parser, Debug)]
pub struct GetTokenArgs {
    /// Client name for the OAuth configuration
    #[arg(short, long)]
    pub client: String,

    /// Force a refresh even if the current access token is still valid
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Client name for the OAuth configuration
    #[arg(short, long)]
    pub client: String,

    /// Request an offline token instead of a regular refresh token
    #[arg(short, long)]
    pub offline_token: bool,
}

#[derive(Parser, Debug)]
pub struct MtlsTokenArgs {
    /// Client name for the OAuth configuration
    #[arg(short, long)]
    pub client: String,

    /// Path to the client certificate file (PEM)
    #[arg(long)]
    pub cert: PathBuf,

    /// Path to the client key file (PEM)
    #[arg(long)]
    pub key: PathBuf,

    /// Path to the CA certificate used to verify the server. Omitting it
    /// disables server certificate verification.
    #[arg(long = "ca-cert")]
    pub ca_cert: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show settings for this client instead of listing all clients
    #[arg(short, long)]
    pub client: Option<String>,
}
