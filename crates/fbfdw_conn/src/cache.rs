use std::cell::RefCell;
use std::sync::Arc;

use fbfdw_options::{OptionPair, ServerOptions, UserOptions};
use hashbrown::HashMap;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, warn};

use crate::errors::{ConnError, Result};
use crate::session::{Session, SessionEstablisher};

/// Identifies a cached session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionCacheKey {
    pub server_id: u32,
    pub user_id: u32,
}

impl ConnectionCacheKey {
    pub const fn new(server_id: u32, user_id: u32) -> Self {
        ConnectionCacheKey { server_id, user_id }
    }
}

/// Supplies the catalog records needed to establish a session.
///
/// Only consulted on a cache miss.
pub trait CredentialsProvider {
    fn server_name(&self) -> &str;
    fn server_options(&self) -> Result<ServerOptions>;
    fn user_options(&self) -> Result<UserOptions>;
}

/// Credentials taken from raw catalog option lists.
#[derive(Debug, Clone, Default)]
pub struct OptionListCredentials {
    pub server_name: String,
    pub server_options: Vec<OptionPair>,
    pub user_options: Vec<OptionPair>,
}

impl CredentialsProvider for OptionListCredentials {
    fn server_name(&self) -> &str {
        &self.server_name
    }

    fn server_options(&self) -> Result<ServerOptions> {
        Ok(ServerOptions::try_from_options(&self.server_options)?)
    }

    fn user_options(&self) -> Result<UserOptions> {
        Ok(UserOptions::try_from_options(&self.user_options)?)
    }
}

#[derive(Debug, Default)]
struct CacheEntry {
    /// Empty until the first successful handshake.
    session: Option<Arc<Session>>,
}

/// Per key slot. Locked for the whole of an establishment so concurrent
/// lookups of the same key wait for a single handshake. The lock is
/// reentrant, and the `RefCell` borrow tells a nested lookup on the same
/// thread apart from a waiting one.
type EntrySlot = Arc<ReentrantMutex<RefCell<CacheEntry>>>;

/// Process wide map of server/user pairs to established sessions.
///
/// The map is created on first lookup. Entries are never evicted, and a
/// cached session is returned as is without any liveness check. Failures on
/// use are for the caller to report.
///
/// The map lock is only held to find a key's slot. Credential lookups and
/// the handshake run under the slot lock alone, so they may call back into
/// the cache.
#[derive(Debug)]
pub struct ConnectionCache {
    establisher: SessionEstablisher,
    entries: Mutex<Option<HashMap<ConnectionCacheKey, EntrySlot>>>,
}

impl ConnectionCache {
    pub fn new(establisher: SessionEstablisher) -> Self {
        ConnectionCache {
            establisher,
            entries: Mutex::new(None),
        }
    }

    /// Get the session for `key`, establishing it if needed.
    ///
    /// At most one handshake runs per key. A failed handshake leaves the
    /// entry empty and the next call tries again. Looking up a key from
    /// within its own establishment fails with
    /// [`ConnError::EstablishInProgress`].
    pub fn get_connection(
        &self,
        key: ConnectionCacheKey,
        credentials: &dyn CredentialsProvider,
    ) -> Result<Arc<Session>> {
        let slot = self.slot(key);
        let guard = slot.lock();
        let mut entry = guard
            .try_borrow_mut()
            .map_err(|_| ConnError::EstablishInProgress(credentials.server_name().to_string()))?;

        if let Some(session) = &entry.session {
            return Ok(session.clone());
        }

        debug!(
            server = %credentials.server_name(),
            server_id = key.server_id,
            user_id = key.user_id,
            "establishing new session"
        );

        let server = credentials.server_options()?;
        let user = credentials.user_options()?;
        let session = Arc::new(self.establisher.establish(&server, &user)?);
        entry.session = Some(session.clone());

        Ok(session)
    }

    /// Number of entries holding a live session.
    pub fn cached_connection_count(&self) -> usize {
        self.slots()
            .into_iter()
            .filter(|(_, slot)| {
                let guard = slot.lock();
                // A slot borrowed on this thread is mid establishment.
                let live = match guard.try_borrow() {
                    Ok(entry) => entry.session.is_some(),
                    Err(_) => false,
                };
                live
            })
            .count()
    }

    pub fn is_initialized(&self) -> bool {
        self.entries.lock().is_some()
    }

    /// Close every cached session, returning how many were closed.
    ///
    /// Meant for shutdown. Does nothing if the cache was never used.
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        for (key, slot) in self.slots() {
            let session = {
                let guard = slot.lock();
                let taken = match guard.try_borrow_mut() {
                    Ok(mut entry) => entry.session.take(),
                    Err(_) => None,
                };
                taken
            };
            let Some(session) = session else {
                continue;
            };

            if Arc::strong_count(&session) > 1 {
                warn!(
                    server_id = key.server_id,
                    user_id = key.user_id,
                    "closing session that is still borrowed"
                );
            }
            if session.close() {
                debug!(db_path = %session.db_path(), "closed session");
                closed += 1;
            }
        }

        closed
    }

    /// Slot for `key`, created along with the map on first use.
    fn slot(&self, key: ConnectionCacheKey) -> EntrySlot {
        let mut guard = self.entries.lock();
        let entries = guard.get_or_insert_with(|| {
            debug!("initializing connection cache");
            HashMap::new()
        });
        entries
            .entry(key)
            .or_insert_with(|| Arc::new(ReentrantMutex::new(RefCell::new(CacheEntry::default()))))
            .clone()
    }

    /// Snapshot of all slots, taken without holding the map lock afterwards.
    fn slots(&self) -> Vec<(ConnectionCacheKey, EntrySlot)> {
        match self.entries.lock().as_ref() {
            Some(entries) => entries
                .iter()
                .map(|(key, slot)| (*key, slot.clone()))
                .collect(),
            None => Vec::new(),
        }
    }
}
