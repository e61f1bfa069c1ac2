pub mod encoding;
pub mod pages;
pub mod relying_party;
pub mod response;
pub mod server;
