use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

pub const DEFAULT_SERVER_LISTEN: &str = "127.0.0.1:9091";
pub const DEFAULT_DATABASE_URL: &str = "kanmon.db";

pub const DEFAULT_CLIENT_LISTEN: &str = "127.0.0.1:9090";
pub const DEFAULT_CLIENT_ID: &str = "oauth-client-1";
pub const DEFAULT_CLIENT_SECRET: &str = "oauth-client-secret-1";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:9090/callback";
pub const DEFAULT_AUTHORIZE_ENDPOINT: &str = "http://localhost:9091/authorize";
pub const DEFAULT_TOKEN_ENDPOINT: &str = "http://localhost:9091/token";
pub const DEFAULT_EXCHANGE_TIMEOUT: &str = "10";

/// Authorization server settings.
#[derive(Debug, Clone)]
#[derive(clap::Args)]
pub struct ServerConfig {
    #[clap(long, env = "KANMON_SERVER_LISTEN", default_value = DEFAULT_SERVER_LISTEN)]
    pub server_listen: SocketAddr,
    #[clap(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,
    /// Server-side key mixed into every client secret hash.
    #[clap(long, env = "HASH_SECRET", hide_env_values = true)]
    pub hash_secret: String,
}

/// Relying-party settings: who it is, and where the authorization server
/// lives.
#[derive(Debug, Clone)]
#[derive(clap::Args)]
pub struct ClientConfig {
    #[clap(long, env = "KANMON_CLIENT_LISTEN", default_value = DEFAULT_CLIENT_LISTEN)]
    pub client_listen: SocketAddr,
    #[clap(long, env = "KANMON_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    pub client_id: String,
    #[clap(long, env = "KANMON_CLIENT_SECRET", default_value = DEFAULT_CLIENT_SECRET, hide_env_values = true)]
    pub client_secret: String,
    #[clap(long, env = "KANMON_REDIRECT_URI", default_value = DEFAULT_REDIRECT_URI)]
    pub redirect_uri: String,
    #[clap(long, env = "KANMON_AUTHORIZE_ENDPOINT", default_value = DEFAULT_AUTHORIZE_ENDPOINT)]
    pub authorize_endpoint: Url,
    #[clap(long, env = "KANMON_TOKEN_ENDPOINT", default_value = DEFAULT_TOKEN_ENDPOINT)]
    pub token_endpoint: Url,
    /// Space-delimited scope to request; omitted from the authorize URL
    /// when unset.
    #[clap(long = "client-scope", env = "KANMON_CLIENT_SCOPE")]
    pub scope: Option<String>,
    /// Upper bound, in seconds, on the code-for-token exchange.
    #[clap(
        long,
        env = "KANMON_EXCHANGE_TIMEOUT",
        default_value = DEFAULT_EXCHANGE_TIMEOUT,
        parse(try_from_str = parse_seconds)
    )]
    pub exchange_timeout: Duration,
}

fn parse_seconds(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse().map(Duration::from_secs)
}

impl ClientConfig {
    /// The reference relying party, pointed at the authorization server
    /// rooted at `server`.
    pub fn for_server(server: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            client_listen: SocketAddr::from(([127, 0, 0, 1], 9090)),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: DEFAULT_CLIENT_SECRET.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            authorize_endpoint: server.join("authorize")?,
            token_endpoint: server.join("token")?,
            scope: None,
            exchange_timeout: Duration::from_secs(10),
        })
    }
}
