//! v002: catalogue of lazily created register tables.

use rusqlite::Connection;

use tgis_core::errors::TgisResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TgisResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS register_tables (
            table_name  TEXT PRIMARY KEY COLLATE NOCASE,
            owner_kind  TEXT NOT NULL,
            owner_id    TEXT NOT NULL,
            member_kind TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_register_tables_owner
            ON register_tables(owner_kind, owner_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
