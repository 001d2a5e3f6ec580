use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fbfdw_conn::errors::BoxError;
use fbfdw_conn::{
    ConnectParams, ConnectionCache, ConnectionCacheKey, MessageLevel, OptionListCredentials,
    RemoteConnection, RemoteConnector, SessionEstablisher,
};

#[derive(Default)]
struct CountingConnector {
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl RemoteConnector for CountingConnector {
    fn connect(&self, params: &ConnectParams) -> Result<Box<dyn RemoteConnection>, BoxError> {
        if params.db_path.starts_with("unreachable") {
            return Err("network error".into());
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Conn {
            closed: self.closed.clone(),
        }))
    }
}

struct Conn {
    closed: Arc<AtomicUsize>,
}

impl RemoteConnection for Conn {
    fn is_ready(&self) -> bool {
        true
    }

    fn error_message(&self) -> String {
        String::new()
    }

    fn set_autocommit(&mut self, _autocommit: bool) {}

    fn set_client_min_messages(&mut self, _level: MessageLevel) {}
}

impl Drop for Conn {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

fn credentials(address: &str, port: &str) -> OptionListCredentials {
    OptionListCredentials {
        server_name: address.to_string(),
        server_options: vec![
            ("address".to_string(), address.to_string()),
            ("port".to_string(), port.to_string()),
            ("database".to_string(), "/var/lib/firebird/employee.fdb".to_string()),
        ],
        user_options: vec![
            ("username".to_string(), "sysdba".to_string()),
            ("password".to_string(), "masterkey".to_string()),
        ],
    }
}

#[test]
fn cache_lifecycle() {
    logutil::init_test();

    let connector = Arc::new(CountingConnector::default());
    let cache = ConnectionCache::new(SessionEstablisher::new(connector.clone(), "WIN866"));
    let creds = credentials("fb1", "3051");

    let key = ConnectionCacheKey::new(100, 10);
    let session = cache.get_connection(key, &creds).unwrap();
    assert_eq!(session.db_path(), "fb1/3051:/var/lib/firebird/employee.fdb");
    assert!(session.autocommit());

    // Borrowed for a statement, then handed back.
    let ready = session.with_connection(|conn| conn.is_ready()).unwrap();
    assert!(ready);
    drop(session);

    let again = cache.get_connection(key, &creds).unwrap();
    assert_eq!(connector.opened.load(Ordering::SeqCst), 1);

    let other = cache
        .get_connection(ConnectionCacheKey::new(100, 11), &creds)
        .unwrap();
    assert_eq!(connector.opened.load(Ordering::SeqCst), 2);
    assert_eq!(cache.cached_connection_count(), 2);

    assert_eq!(cache.close_all(), 2);
    assert_eq!(connector.closed.load(Ordering::SeqCst), 2);
    assert!(again.is_closed());
    assert!(other.is_closed());
    assert_eq!(
        again.with_connection(|_| ()).unwrap_err().sqlstate(),
        "08003"
    );
}

#[test]
fn unreachable_server_is_not_cached() {
    let connector = Arc::new(CountingConnector::default());
    let cache = ConnectionCache::new(SessionEstablisher::new(connector.clone(), "UTF8"));
    let key = ConnectionCacheKey::new(7, 7);

    for _ in 0..3 {
        let err = cache
            .get_connection(key, &credentials("unreachable", "3050"))
            .unwrap_err();
        assert_eq!(err.sqlstate(), "HV00N");
        assert_eq!(
            err.to_string(),
            "Unable to connect to foreign server \"unreachable:/var/lib/firebird/employee.fdb\": network error"
        );
    }

    assert_eq!(cache.cached_connection_count(), 0);
    assert_eq!(cache.close_all(), 0);
}
