//! Sessions with remote Firebird databases.
//!
//! [`ConnectionCache`] hands out one [`Session`] per server and user pair for
//! the life of the process, establishing it lazily through a
//! [`RemoteConnector`] supplied by the embedding host.

pub mod cache;
pub mod client;
pub mod encoding;
pub mod errors;
pub mod session;

#[cfg(test)]
mod testutil;

pub use cache::{ConnectionCache, ConnectionCacheKey, CredentialsProvider, OptionListCredentials};
pub use client::{ConnectParams, MessageLevel, RemoteConnection, RemoteConnector};
pub use encoding::client_encoding;
pub use errors::{ConnError, Result};
pub use session::{SESSION_MESSAGE_LEVEL, Session, SessionEstablisher, db_path};
