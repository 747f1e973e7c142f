//! Command handlers. Tokens go to stdout alone so the tool composes in
//! scripts; prompts and progress go to stderr.

use std::io::{BufRead, Write};
use std::time::Duration;

use crate::auth::device_code::{DeviceCodeFlow, DevicePoll};
use crate::auth::error::AuthError;
use crate::auth::service::AuthService;
use crate::auth::store::{ClientConfig, CredentialStore};

use super::{GetTokenArgs, InitArgs, ListArgs, LoginArgs, MtlsTokenArgs};

pub async fn handle_init(store: &CredentialStore, args: &InitArgs) -> Result<(), AuthError> {
    let client_id = prompt("Enter Client ID: ")?;
    let client_secret = prompt("Enter Client Secret (leave blank if not applicable): ")?;
    let discovery_url = prompt("Enter OAuth/OIDC Discovery URL/Well-Known URL: ")?;

    let discovery = fetch_discovery(&discovery_url).await;
    let token_issue_url = match discovery.as_ref().ok().and_then(|doc| doc.token_endpoint.clone()) {
        Some(url) => url,
        None => prompt("token_endpoint not found in discovery document. Enter it manually: ")?,
    };
    let device_code_url = match discovery
        .as_ref()
        .ok()
        .and_then(|doc| doc.device_authorization_endpoint.clone())
    {
        Some(url) => url,
        None => prompt(
            "device_authorization_endpoint not found in discovery document. Enter it manually: ",
        )?,
    };

    let config = ClientConfig {
        client_id,
        client_secret,
        token_issue_url,
        device_code_url,
    };
    store.save_config(&args.client, &config)?;
    eprintln!("Configuration initialized successfully.");
    Ok(())
}

pub async fn handle_get_token(store: &CredentialStore, args: &GetTokenArgs) -> Result<(), AuthError> {
    let service = AuthService::new(store.clone());
    let token = service.get_token(&args.client, args.force).await?;
    println!("{token}");
    Ok(())
}

pub async fn handle_login(store: &CredentialStore, args: &LoginArgs) -> Result<(), AuthError> {
    let config = store.load_config(&args.client)?;
    let service = AuthService::new(store.clone());
    let flow = DeviceCodeFlow::new();

    let session = flow.start(&config, args.offline_token).await?;
    let (uri, user_code) = session.operator_prompt();
    eprintln!("Please visit the following URL and authorize this client:");
    eprintln!("  {uri}");
    if let Some(code) = user_code {
        eprintln!("Enter the user code: {code}");
    }
    eprint!("Once finished in the browser, press Enter to continue...");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    loop {
        match flow.poll(&config, &session).await? {
            DevicePoll::Authorized(pair) => {
                let token = service.complete_login(&args.client, &pair)?;
                eprintln!("Access token obtained:");
                println!("{token}");
                return Ok(());
            }
            DevicePoll::Pending { interval_secs } => {
                eprintln!("Authorization pending, retrying in {interval_secs} seconds...");
                tokio::time::sleep(Duration::from_secs(interval_secs)).await;
            }
            DevicePoll::SlowDown { interval_secs } => {
                eprintln!("Issuer asked to slow down, retrying in {interval_secs} seconds...");
                tokio::time::sleep(Duration::from_secs(interval_secs)).await;
            }
            DevicePoll::Denied => {
                return Err(AuthError::Issuer {
                    status: 400,
                    message: "access_denied: the user rejected the authorization request"
                        .to_string(),
                });
            }
            DevicePoll::Expired => {
                return Err(AuthError::Issuer {
                    status: 400,
                    message: "expired_token: the device code lapsed, run login again".to_string(),
                });
            }
        }
    }
}

pub fn handle_logout(store: &CredentialStore, client: &str) -> Result<(), AuthError> {
    // Keep the client initialized; only the token material is discarded.
    store.load_config(client)?;
    store.clear_tokens(client)?;
    eprintln!("Logged out successfully.");
    Ok(())
}

pub async fn handle_mtls_token(store: &CredentialStore, args: &MtlsTokenArgs) -> Result<(), AuthError> {
    let service = AuthService::new(store.clone());
    let token = service
        .mtls_token(&args.client, &args.cert, &args.key, args.ca_cert.as_deref())
        .await?;
    println!("{token}");
    Ok(())
}

pub fn handle_list(store: &CredentialStore, args: &ListArgs) -> Result<(), AuthError> {
    match &args.client {
        None => {
            let clients = store.list_clients()?;
            if clients.is_empty() {
                eprintln!("No clients configured.");
                return Ok(());
            }
            for client in clients {
                println!("{client}");
            }
        }
        Some(client) => {
            let config = store.load_config(client)?;
            let mut value = serde_json::to_value(&config)?;
            if !config.client_secret.is_empty() {
                value["client_secret"] = serde_json::Value::String(mask_secret(&config.client_secret));
            }
            eprintln!("Settings for client '{client}':");
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

pub fn handle_delete(store: &CredentialStore, client: &str) -> Result<(), AuthError> {
    store.delete_client(client)?;
    eprintln!("Config folder deleted successfully for client: {client}");
    Ok(())
}

/// Keep the first and last characters, star out the rest.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let mut masked = String::new();
    masked.push(chars[0]);
    masked.push_str(&"*".repeat(chars.len() - 2));
    masked.push(chars[chars.len() - 1]);
    masked
}

fn prompt(label: &str) -> Result<String, AuthError> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[derive(Debug, serde::Deserialize)]
struct DiscoveryDocument {
    token_endpoint: Option<String>,
    device_authorization_endpoint: Option<String>,
}

async fn fetch_discovery(url: &str) -> Result<DiscoveryDocument, AuthError> {
    let doc = reqwest::get(url).await?.json::<DiscoveryDocument>().await?;
    Ok(doc)
}
