use diesel::prelude::*;

use crate::core::models::{AuthCodeData, AuthRequestData, TokenData};
use crate::core::types::{
    ClientId, HashedAccessToken, HashedAuthCode, RecordId, RedirectUri, RequestId, ResponseType,
    Scope,
};

use super::schema::*;

#[derive(Debug)]
#[derive(Queryable, Insertable)]
#[diesel(table_name = uris)]
pub struct Uri {
    pub client_id: String,
    pub uri: String,
}

#[derive(Debug)]
#[derive(Queryable, Insertable)]
#[diesel(table_name = clients)]
pub struct Client {
    pub client_id: String,
    pub name: String,
    pub secret_hash: String,
}

#[derive(Debug)]
#[derive(Queryable, Insertable)]
#[diesel(table_name = requests)]
pub struct Request {
    pub id: String,
    pub client_id: String,
    pub response_type: String,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub scope: String,
}

#[derive(Debug)]
#[derive(Queryable, Insertable)]
#[diesel(table_name = codes)]
pub struct Code {
    pub id: String,
    pub code: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub consumed: bool,
}

#[derive(Debug)]
#[derive(Queryable, Insertable)]
#[diesel(table_name = tokens)]
pub struct Token {
    pub id: String,
    pub token: String,
    pub client_id: String,
    pub scope: String,
}

impl From<AuthRequestData> for Request {
    fn from(data: AuthRequestData) -> Self {
        Self {
            id: data.id.0,
            client_id: data.client_id.0,
            response_type: data.response_type.0,
            redirect_uri: data.redirect_uri.0,
            state: data.state,
            scope: data.scope.as_joined(),
        }
    }
}

impl From<Request> for AuthRequestData {
    fn from(row: Request) -> Self {
        Self {
            id: RequestId(row.id),
            client_id: ClientId(row.client_id),
            response_type: ResponseType(row.response_type),
            redirect_uri: RedirectUri(row.redirect_uri),
            state: row.state,
            scope: Scope::from_delimited_parts(&row.scope),
        }
    }
}

impl From<AuthCodeData> for Code {
    fn from(data: AuthCodeData) -> Self {
        Self {
            id: data.id.0,
            code: data.code.0,
            client_id: data.client_id.0,
            redirect_uri: data.redirect_uri.0,
            scope: data.scope.as_joined(),
            consumed: data.consumed,
        }
    }
}

impl From<Code> for AuthCodeData {
    fn from(row: Code) -> Self {
        Self {
            id: RecordId(row.id),
            code: HashedAuthCode(row.code),
            client_id: ClientId(row.client_id),
            redirect_uri: RedirectUri(row.redirect_uri),
            scope: Scope::from_delimited_parts(&row.scope),
            consumed: row.consumed,
        }
    }
}

impl From<TokenData> for Token {
    fn from(data: TokenData) -> Self {
        Self {
            id: data.id.0,
            token: data.token.0,
            client_id: data.client_id.0,
            scope: data.scope.as_joined(),
        }
    }
}

impl From<Token> for TokenData {
    fn from(row: Token) -> Self {
        Self {
            id: RecordId(row.id),
            token: HashedAccessToken(row.token),
            client_id: ClientId(row.client_id),
            scope: Scope::from_delimited_parts(&row.scope),
        }
    }
}
