use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::auth::Store;
use crate::core::models::{AuthCodeData, AuthRequestData, Client, TokenData};
use crate::core::types::{
    ClientId, HashedAccessToken, HashedAuthCode, HashedClientSecret, RedirectUri, RequestId,
};
use crate::provider::error::Error;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task::block_in_place;
use tracing::{event, Level};

pub mod models;
pub mod schema;

use schema::{clients, codes, requests, tokens, uris};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type Manager = ConnectionManager<SqliteConnection>;

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub struct DbStore {
    pool: Pool<Manager>,
}

impl DbStore {
    /// Opens a pool on `url`. In-memory databases are private to their
    /// connection, so they get a single one that is never recycled.
    pub fn acquire(url: &str) -> Result<Self, Error> {
        let in_memory = url == ":memory:" || url.contains("mode=memory");

        let builder =
            Pool::<Manager>::builder().connection_customizer(Box::new(ConnectionOptions));
        let builder = if in_memory {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(10)
        };

        let pool = builder.build(ConnectionManager::new(url))?;
        Ok(Self { pool })
    }

    /// A migrated in-memory store.
    pub fn in_memory() -> Result<Self, Error> {
        let store = Self::acquire(":memory:")?;
        store.migrate()?;
        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection<Manager>, Error> {
        Ok(self.pool.get()?)
    }

    pub fn migrate(&self) -> Result<(), Error> {
        let mut conn = self.conn()?;
        let applied = block_in_place(|| conn.run_pending_migrations(MIGRATIONS))
            .map_err(|e| Error::Migration(e.to_string()))?;

        event!(Level::INFO, count = applied.len(), "Ran migrations");
        Ok(())
    }
}

impl Debug for DbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbStore").finish()
    }
}

fn into_client(row: models::Client, redirect_uris: Vec<String>) -> Client {
    Client {
        id: ClientId(row.client_id),
        name: row.name,
        secret: HashedClientSecret(row.secret_hash),
        redirect_uris: redirect_uris.into_iter().map(RedirectUri).collect(),
    }
}

impl Store for DbStore {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            let found = clients::table
                .find(&id.0)
                .first::<models::Client>(&mut conn)
                .optional()?;

            match found {
                Some(row) => {
                    let registered = uris::table
                        .filter(uris::client_id.eq(&id.0))
                        .order(uris::uri)
                        .select(uris::uri)
                        .load::<String>(&mut conn)?;
                    Ok(Some(into_client(row, registered)))
                }
                None => Ok(None),
            }
        })
    }

    fn put_client(&self, client: Client) -> Result<Client, Error> {
        if client.redirect_uris.is_empty() {
            return Err(Error::BadRequest("a client needs at least one redirect uri"));
        }

        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            conn.transaction::<_, Error, _>(|conn| {
                diesel::insert_into(clients::table)
                    .values(models::Client {
                        client_id: client.id.0.clone(),
                        name: client.name.clone(),
                        secret_hash: client.secret.0.clone(),
                    })
                    .execute(conn)?;

                for uri in &client.redirect_uris {
                    diesel::insert_or_ignore_into(uris::table)
                        .values(models::Uri {
                            client_id: client.id.0.clone(),
                            uri: uri.0.clone(),
                        })
                        .execute(conn)?;
                }
                Ok(())
            })
        })?;

        Ok(client)
    }

    fn delete_client(&self, id: &ClientId) -> Result<bool, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;
            let deleted = diesel::delete(clients::table.find(&id.0)).execute(&mut conn)?;
            Ok(deleted == 1)
        })
    }

    fn list_clients(&self) -> Result<Vec<Client>, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            let rows = clients::table
                .order(clients::client_id)
                .load::<models::Client>(&mut conn)?;

            let mut by_client: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for row in uris::table.order(uris::uri).load::<models::Uri>(&mut conn)? {
                by_client.entry(row.client_id).or_default().push(row.uri);
            }

            Ok(rows
                .into_iter()
                .map(|row| {
                    let registered = by_client.remove(&row.client_id).unwrap_or_default();
                    into_client(row, registered)
                })
                .collect())
        })
    }

    fn add_client_uri(&self, id: &ClientId, uri: &RedirectUri) -> Result<(), Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            conn.transaction::<_, Error, _>(|conn| {
                clients::table
                    .find(&id.0)
                    .first::<models::Client>(conn)
                    .optional()?
                    .ok_or(Error::BadRequest("unknown client"))?;

                diesel::insert_or_ignore_into(uris::table)
                    .values(models::Uri {
                        client_id: id.0.clone(),
                        uri: uri.0.clone(),
                    })
                    .execute(conn)?;
                Ok(())
            })
        })
    }

    fn delete_client_uri(&self, id: &ClientId, uri: &RedirectUri) -> Result<bool, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            conn.immediate_transaction::<_, Error, _>(|conn| {
                let registered = uris::table
                    .filter(uris::client_id.eq(&id.0))
                    .select(uris::uri)
                    .load::<String>(conn)?;

                if !registered.contains(&uri.0) {
                    return Ok(false);
                }
                if registered.len() == 1 {
                    return Err(Error::BadRequest("cannot remove the last redirect uri"));
                }

                diesel::delete(uris::table.find((&id.0, &uri.0))).execute(conn)?;
                Ok(true)
            })
        })
    }

    fn store_request(&self, data: AuthRequestData) -> Result<AuthRequestData, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;
            diesel::insert_into(requests::table)
                .values(models::Request::from(data.clone()))
                .execute(&mut conn)?;
            Ok(())
        })?;

        Ok(data)
    }

    fn take_request(&self, id: &RequestId) -> Result<Option<AuthRequestData>, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            conn.immediate_transaction::<_, Error, _>(|conn| {
                let found = requests::table
                    .find(&id.0)
                    .first::<models::Request>(conn)
                    .optional()?;

                let row = match found {
                    Some(row) => row,
                    None => return Ok(None),
                };

                let deleted = diesel::delete(requests::table.find(&id.0)).execute(conn)?;
                Ok((deleted == 1).then(|| row.into()))
            })
        })
    }

    fn store_code(&self, data: AuthCodeData) -> Result<AuthCodeData, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;
            diesel::insert_into(codes::table)
                .values(models::Code::from(data.clone()))
                .execute(&mut conn)?;
            Ok(())
        })?;

        Ok(data)
    }

    fn consume_code(
        &self,
        client_id: &ClientId,
        code: &HashedAuthCode,
    ) -> Result<Option<AuthCodeData>, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;

            conn.immediate_transaction::<_, Error, _>(|conn| {
                let claimed = diesel::update(
                    codes::table
                        .filter(codes::code.eq(&code.0))
                        .filter(codes::client_id.eq(&client_id.0))
                        .filter(codes::consumed.eq(false)),
                )
                .set(codes::consumed.eq(true))
                .execute(conn)?;

                if claimed != 1 {
                    return Ok(None);
                }

                let row = codes::table
                    .filter(codes::code.eq(&code.0))
                    .first::<models::Code>(conn)?;
                Ok(Some(row.into()))
            })
        })
    }

    fn store_token(&self, data: TokenData) -> Result<TokenData, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;
            diesel::insert_into(tokens::table)
                .values(models::Token::from(data.clone()))
                .execute(&mut conn)?;
            Ok(())
        })?;

        Ok(data)
    }

    fn find_token(&self, token: &HashedAccessToken) -> Result<Option<TokenData>, Error> {
        block_in_place(|| -> Result<_, Error> {
            let mut conn = self.conn()?;
            let found = tokens::table
                .filter(tokens::token.eq(&token.0))
                .first::<models::Token>(&mut conn)
                .optional()?;
            Ok(found.map(Into::into))
        })
    }
}
