pub mod auth;
pub mod config;
pub mod core;
pub mod db;
pub mod http;
pub mod provider;
pub mod relying_party;
pub mod util;
