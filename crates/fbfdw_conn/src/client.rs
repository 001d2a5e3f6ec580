//! Seam between the cache and the Firebird client library.

use std::fmt;

use crate::errors::BoxError;

/// Severity threshold for diagnostics the remote client forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageLevel {
    Debug5,
    Debug4,
    Debug3,
    Debug2,
    Debug1,
    Log,
    Info,
    Notice,
    Warning,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug5 => "debug5",
            Self::Debug4 => "debug4",
            Self::Debug3 => "debug3",
            Self::Debug2 => "debug2",
            Self::Debug1 => "debug1",
            Self::Log => "log",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Parameters for a single handshake.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub db_path: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub client_encoding: String,
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("db_path", &self.db_path)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("client_encoding", &self.client_encoding)
            .finish()
    }
}

/// Opens connections to remote databases.
pub trait RemoteConnector: Send + Sync {
    fn connect(&self, params: &ConnectParams) -> Result<Box<dyn RemoteConnection>, BoxError>;
}

/// An open connection.
///
/// Implementations close the underlying connection when dropped.
pub trait RemoteConnection: Send {
    /// Whether the handshake completed and the connection accepts statements.
    fn is_ready(&self) -> bool;

    /// Last error reported by the client library.
    fn error_message(&self) -> String;

    fn set_autocommit(&mut self, autocommit: bool);

    fn set_client_min_messages(&mut self, level: MessageLevel);
}
