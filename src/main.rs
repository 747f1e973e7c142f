//! tokendokey binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tokendokey::auth::store::CredentialStore;
use tokendokey::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = CredentialStore::new_default();

    let result = match &cli.command {
        Commands::Init(args) => commands::handle_init(&store, args).await,
        Commands::GetToken(args) => commands::handle_get_token(&store, args).await,
        Commands::Login(args) => commands::handle_login(&store, args).await,
        Commands::Logout(args) => commands::handle_logout(&store, &args.client),
        Commands::MtlsToken(args) => commands::handle_mtls_token(&store, args).await,
        Commands::List(args) => commands::handle_list(&store, args),
        Commands::Delete(args) => commands::handle_delete(&store, &args.client),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
