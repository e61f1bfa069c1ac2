use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{event, Level};

use kanmon::config::{ClientConfig, ServerConfig};
use kanmon::db::DbStore;
use kanmon::http::relying_party;
use kanmon::http::server::Server;
use kanmon::provider::OAuth2Provider;
use kanmon::relying_party::RelyingParty;
use kanmon::util::hash::HashingService;

#[derive(Parser)]
#[clap(
    name = "kanmond",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
struct Options {
    #[clap(subcommand)]
    role: Role,
}

#[derive(clap::Subcommand)]
enum Role {
    /// Run the authorization server.
    Server(ServerConfig),
    /// Run the reference relying party.
    Client(ClientConfig),
    /// Run both in one process.
    Both {
        #[clap(flatten)]
        server: ServerConfig,
        #[clap(flatten)]
        client: ClientConfig,
    },
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn build_server(config: ServerConfig) -> Result<Server, BoxError> {
    let store = DbStore::acquire(&config.database_url)?;
    store.migrate()?;
    let hasher = HashingService::with_secret_key(config.hash_secret);

    let provider = OAuth2Provider::new(store, hasher);
    Ok(Server::new(Arc::new(provider)))
}

fn build_client(config: ClientConfig) -> Result<Arc<RelyingParty>, BoxError> {
    Ok(Arc::new(RelyingParty::new(Arc::new(config))?))
}

async fn kanmond(role: Role) -> Result<(), BoxError> {
    match role {
        Role::Server(config) => {
            let listen = config.server_listen;
            build_server(config)?.serve(listen).await;
        }
        Role::Client(config) => {
            let listen = config.client_listen;
            relying_party::serve(build_client(config)?, listen).await;
        }
        Role::Both { server, client } => {
            let (server_listen, client_listen) = (server.server_listen, client.client_listen);
            let server = build_server(server)?;
            let client = build_client(client)?;
            tokio::join!(
                server.serve(server_listen),
                relying_party::serve(client, client_listen)
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let opts = Options::parse();
    match kanmond(opts.role).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            event!(Level::ERROR, error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}
