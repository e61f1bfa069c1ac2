use crate::auth::Store;
use crate::config::DEFAULT_DATABASE_URL;
use crate::core::models::Client;
use crate::core::types::{ClientId, ClientSecret, RedirectUri};
use crate::db::DbStore;
use crate::provider::error::Error;
use crate::util::hash::HashingService;

use clap::Parser;

#[derive(Parser)]
#[clap(
    name = "kanmon-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    #[clap(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[clap(long, env = "HASH_SECRET", hide_env_values = true)]
    hash_secret: String,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    ListClients(ListClients),
    CreateClient(CreateClient),
    DeleteClient(DeleteClient),
    ListClientUris(ListClientUris),
    AddClientUri(AddClientUri),
    DeleteClientUri(DeleteClientUri),
}

#[derive(Parser)]
struct ListClients;

#[derive(Parser)]
struct CreateClient {
    #[clap(short, long)]
    id: String,
    #[clap(short, long)]
    name: String,
    #[clap(short, long)]
    secret: String,
    /// Redirect URI; repeat for more than one.
    #[clap(short, long = "uri", required = true)]
    uris: Vec<String>,
}

#[derive(Parser)]
struct DeleteClient {
    #[clap(short, long)]
    id: String,
}

#[derive(Parser)]
struct ListClientUris {
    #[clap(short, long)]
    id: String,
}

#[derive(Parser)]
struct AddClientUri {
    #[clap(short, long)]
    id: String,
    #[clap(short, long)]
    uri: String,
}

#[derive(Parser)]
struct DeleteClientUri {
    #[clap(short, long)]
    id: String,
    #[clap(short, long)]
    uri: String,
}

fn get_database(url: &str) -> Result<DbStore, Error> {
    let store = DbStore::acquire(url)?;
    store.migrate()?;
    Ok(store)
}

fn get_hasher(secret: &str) -> HashingService {
    HashingService::with_secret_key(secret.to_string())
}

fn list_clients(db: &DbStore) -> Result<(), Error> {
    for client in db.list_clients()? {
        println!("{} (name: \"{}\")", client.id, client.name);
    }
    Ok(())
}

fn create_client(c: &CreateClient, db: &DbStore, opts: &Options) -> Result<(), Error> {
    let hasher = get_hasher(&opts.hash_secret);
    let secret = hasher.hash(&ClientSecret(c.secret.to_string()))?;

    let client = Client {
        id: ClientId(c.id.to_string()),
        name: c.name.to_string(),
        secret,
        redirect_uris: c.uris.iter().cloned().map(RedirectUri).collect(),
    };

    db.put_client(client)?;
    Ok(())
}

fn delete_client(c: &DeleteClient, db: &DbStore) -> Result<(), Error> {
    if db.delete_client(&ClientId(c.id.to_string()))? {
        Ok(())
    } else {
        Err(Error::BadRequest("no such client"))
    }
}

fn list_client_uris(c: &ListClientUris, db: &DbStore) -> Result<(), Error> {
    let client = db
        .get_client(&ClientId(c.id.to_string()))?
        .ok_or(Error::BadRequest("no such client"))?;

    for uri in client.redirect_uris {
        println!("{}", uri);
    }
    Ok(())
}

fn add_client_uri(c: &AddClientUri, db: &DbStore) -> Result<(), Error> {
    db.add_client_uri(&ClientId(c.id.to_string()), &RedirectUri(c.uri.to_string()))
}

fn delete_client_uri(c: &DeleteClientUri, db: &DbStore) -> Result<(), Error> {
    let removed =
        db.delete_client_uri(&ClientId(c.id.to_string()), &RedirectUri(c.uri.to_string()))?;
    if removed {
        Ok(())
    } else {
        Err(Error::BadRequest("no such uri"))
    }
}

pub fn run_cli_action(opts: Options) -> Result<(), Error> {
    use SubCommand::*;

    let db = get_database(&opts.database_url)?;

    match &opts.command {
        ListClients(_) => list_clients(&db),
        CreateClient(c) => create_client(c, &db, &opts),
        DeleteClient(c) => delete_client(c, &db),
        ListClientUris(c) => list_client_uris(c, &db),
        AddClientUri(c) => add_client_uri(c, &db),
        DeleteClientUri(c) => delete_client_uri(c, &db),
    }
}
