//! SQLite PRAGMA configuration.
//!
//! Must be called on every connection immediately after opening.

use rusqlite::Connection;

use tgis_core::errors::TgisResult;

use crate::to_storage_err;

/// Configure the read-write connection.
pub fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> TgisResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA temp_store = MEMORY;
        "
    ))
    .map_err(|e| to_storage_err(format!("configure connection: {e}")))
}

/// Configure a read-only connection. The journal mode is a property of the
/// file and already set by the writer.
pub fn configure_readonly_connection(conn: &Connection, busy_timeout_ms: u64) -> TgisResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA temp_store = MEMORY;
        PRAGMA query_only = ON;
        "
    ))
    .map_err(|e| to_storage_err(format!("configure reader: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_pragmas() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, 5000).unwrap();

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        // In-memory databases report "memory" instead of "wal".
        assert!(journal_mode == "wal" || journal_mode == "memory");

        let fk: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn busy_timeout_follows_config() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, 1234).unwrap();

        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 1234);
    }

    #[test]
    fn readonly_connection_rejects_writes() {
        let conn = Connection::open_in_memory().unwrap();
        configure_readonly_connection(&conn, 5000).unwrap();
        assert!(conn.execute_batch("CREATE TABLE t (x INTEGER)").is_err());
    }
}
