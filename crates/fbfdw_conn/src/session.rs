use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fbfdw_options::{FIREBIRD_DEFAULT_PORT, OptionsError, ServerOptions, UserOptions};
use parking_lot::ReentrantMutex;
use tracing::{debug, trace};

use crate::client::{ConnectParams, MessageLevel, RemoteConnection, RemoteConnector};
use crate::encoding::client_encoding;
use crate::errors::{ConnError, Result};

/// Diagnostic level every session is switched to after the handshake.
pub const SESSION_MESSAGE_LEVEL: MessageLevel = MessageLevel::Debug2;

/// Firebird database path for a server.
///
/// With an address the path is `address:database`, or `address/port:database`
/// when a non-default port is configured. Without one it is the bare
/// database, resolved by the client library.
pub fn db_path(server: &ServerOptions) -> Result<String> {
    let database = server
        .database
        .as_deref()
        .ok_or(OptionsError::Missing("database"))?;

    let path = match &server.address {
        Some(address) if server.port != FIREBIRD_DEFAULT_PORT => {
            format!("{address}/{}:{database}", server.port)
        }
        Some(address) => format!("{address}:{database}"),
        None => database.to_string(),
    };

    trace!(%path, "database path");
    Ok(path)
}

/// An established remote session.
///
/// Owned by the connection cache. Other components borrow the connection for
/// the duration of a statement through [`Session::with_connection`] and never
/// close it.
///
/// The connection lock is reentrant so code running inside a borrow may call
/// back into the cache. A nested borrow of the same connection is refused
/// with [`ConnError::SessionBusy`].
pub struct Session {
    db_path: String,
    autocommit: bool,
    message_level: MessageLevel,
    closed: AtomicBool,
    conn: ReentrantMutex<RefCell<Option<Box<dyn RemoteConnection>>>>,
}

impl Session {
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn autocommit(&self) -> bool {
        self.autocommit
    }

    pub fn message_level(&self) -> MessageLevel {
        self.message_level
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Run `f` against the live connection.
    ///
    /// Other threads wait for the borrow to end. If the session is closed
    /// while `f` runs, the connection is released once `f` returns.
    pub fn with_connection<R>(&self, f: impl FnOnce(&mut dyn RemoteConnection) -> R) -> Result<R> {
        let guard = self.conn.lock();
        if self.is_closed() {
            return Err(ConnError::SessionClosed(self.db_path.clone()));
        }

        let mut slot = guard
            .try_borrow_mut()
            .map_err(|_| ConnError::SessionBusy(self.db_path.clone()))?;
        let conn = slot
            .as_mut()
            .ok_or_else(|| ConnError::SessionClosed(self.db_path.clone()))?;

        let out = f(conn.as_mut());

        if self.is_closed() {
            trace!(db_path = %self.db_path, "releasing connection closed during borrow");
            slot.take();
        }

        Ok(out)
    }

    /// Close the connection. Returns false if it was already closed.
    pub(crate) fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }

        let guard = self.conn.lock();
        // Dropping the connection closes it. When a borrow further up this
        // thread's stack holds it, that borrow drops it on the way out.
        if let Ok(mut conn) = guard.try_borrow_mut() {
            conn.take();
        }
        true
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("db_path", &self.db_path)
            .field("autocommit", &self.autocommit)
            .field("message_level", &self.message_level)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Performs the remote handshake for cache misses.
#[derive(Clone)]
pub struct SessionEstablisher {
    connector: Arc<dyn RemoteConnector>,
    client_encoding: String,
}

impl SessionEstablisher {
    /// `database_encoding` is the local database encoding, translated to the
    /// matching Firebird client encoding.
    pub fn new(connector: Arc<dyn RemoteConnector>, database_encoding: &str) -> Self {
        SessionEstablisher {
            connector,
            client_encoding: client_encoding(database_encoding).to_string(),
        }
    }

    pub fn client_encoding(&self) -> &str {
        &self.client_encoding
    }

    /// Connect and apply session defaults.
    ///
    /// Autocommit is always on since statements are never grouped into
    /// remote transactions.
    pub fn establish(&self, server: &ServerOptions, user: &UserOptions) -> Result<Session> {
        let params = ConnectParams {
            db_path: db_path(server)?,
            user: user.username.clone(),
            password: user.password.clone(),
            client_encoding: self.client_encoding.clone(),
        };
        debug!(?params, "connecting to remote database");

        let mut conn =
            self.connector
                .connect(&params)
                .map_err(|e| ConnError::Establish {
                    db_path: params.db_path.clone(),
                    message: e.to_string(),
                })?;

        if !conn.is_ready() {
            return Err(ConnError::Establish {
                db_path: params.db_path,
                message: conn.error_message(),
            });
        }

        conn.set_autocommit(true);
        conn.set_client_min_messages(SESSION_MESSAGE_LEVEL);
        debug!(db_path = %params.db_path, "remote connection ready");

        Ok(Session {
            db_path: params.db_path,
            autocommit: true,
            message_level: SESSION_MESSAGE_LEVEL,
            closed: AtomicBool::new(false),
            conn: ReentrantMutex::new(RefCell::new(Some(conn))),
        })
    }
}

impl fmt::Debug for SessionEstablisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEstablisher")
            .field("client_encoding", &self.client_encoding)
            .finish_non_exhaustive()
    }
}
