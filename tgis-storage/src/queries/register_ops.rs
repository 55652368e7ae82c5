//! Register tables: per-owner junction tables created on first registration.
//!
//! Each register table has a single `id` column holding the ids of the
//! datasets on the other side. Every table is recorded in `register_tables`.

use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use tgis_core::errors::TgisResult;
use tgis_core::models::{DatasetId, DatasetType};
use tgis_core::TgisError;

use super::format_time;
use crate::schema::quote_ident;
use crate::to_storage_err;

/// One row of the `register_tables` catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterTableRow {
    pub table_name: String,
    pub owner_kind: String,
    pub owner_id: String,
    pub member_kind: String,
}

/// Prefix SQLite reserves for its own tables.
const RESERVED_PREFIX: &str = "sqlite_";

/// Numbered alternatives tried before giving up on a name.
const MAX_NAME_SUFFIX: u32 = 1000;

/// Create the register table of an owner and record it in the catalogue.
/// Returns the table name.
///
/// An owner that already has a catalogued table gets that table back.
/// Otherwise `preferred` is used when free; SQLite compares table names
/// case-insensitively, so a name differing only in case from an existing
/// table, or one in the reserved `sqlite_` namespace, is replaced by the
/// first free numbered alternative.
pub fn create_register_table(
    conn: &Connection,
    preferred: &str,
    owner_kind: DatasetType,
    owner_id: &DatasetId,
    member_kind: DatasetType,
) -> TgisResult<String> {
    let owner = owner_id.to_string();
    if let Some(existing) = owner_entry(conn, owner_kind, owner_id)? {
        if table_exists(conn, &existing.table_name)? {
            return Ok(existing.table_name);
        }
        conn.execute(
            "DELETE FROM register_tables WHERE table_name = ?1",
            params![existing.table_name],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }

    let table = free_register_name(conn, preferred)?;
    conn.execute_batch(&format!(
        "CREATE TABLE {} (id TEXT PRIMARY KEY)",
        quote_ident(&table)
    ))
    .map_err(|e| to_storage_err(format!("create register table {table}: {e}")))?;

    conn.execute(
        "INSERT INTO register_tables (table_name, owner_kind, owner_id, member_kind, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            table,
            owner_kind.as_str(),
            owner,
            member_kind.as_str(),
            format_time(&Local::now().naive_local()),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    if table != preferred {
        debug!(table, preferred, owner = %owner, "register table name was taken");
    }
    debug!(table, owner = %owner, "created register table");
    Ok(table)
}

/// Move a register table to a new owner under a name derived from
/// `preferred`. Returns the new table name.
pub fn rename_register_table(
    conn: &Connection,
    table: &str,
    preferred: &str,
    new_owner: &DatasetId,
) -> TgisResult<String> {
    let renamed = free_register_name(conn, preferred)?;
    conn.execute_batch(&format!(
        "ALTER TABLE {} RENAME TO {}",
        quote_ident(table),
        quote_ident(&renamed)
    ))
    .map_err(|e| to_storage_err(format!("rename register table {table}: {e}")))?;
    conn.execute(
        "UPDATE register_tables SET table_name = ?2, owner_id = ?3 WHERE table_name = ?1",
        params![table, renamed, new_owner.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    debug!(from = table, to = %renamed, "renamed register table");
    Ok(renamed)
}

/// First name among `preferred`, `preferred_1`, `preferred_2`, ... that no
/// schema object or catalogue entry uses.
pub fn free_register_name(conn: &Connection, preferred: &str) -> TgisResult<String> {
    let base = if preferred
        .get(..RESERVED_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(RESERVED_PREFIX))
    {
        format!("tgis_{preferred}")
    } else {
        preferred.to_string()
    };
    if !name_taken(conn, &base)? {
        return Ok(base);
    }
    for n in 1..=MAX_NAME_SUFFIX {
        let candidate = format!("{base}_{n}");
        if !name_taken(conn, &candidate)? {
            return Ok(candidate);
        }
    }
    Err(TgisError::ValidationError(format!(
        "no free register table name for {preferred}"
    )))
}

fn name_taken(conn: &Connection, name: &str) -> TgisResult<bool> {
    let in_schema = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE name = ?1 COLLATE NOCASE")
        .and_then(|mut stmt| stmt.exists(params![name]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(in_schema || catalogue_entry(conn, name)?.is_some())
}

/// Drop a register table and its catalogue entry.
pub fn drop_register_table(conn: &Connection, table: &str) -> TgisResult<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
        .map_err(|e| to_storage_err(format!("drop register table {table}: {e}")))?;
    conn.execute(
        "DELETE FROM register_tables WHERE table_name = ?1",
        params![table],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    debug!(table, "dropped register table");
    Ok(())
}

pub fn add_member(conn: &Connection, table: &str, member: &DatasetId) -> TgisResult<()> {
    conn.execute(
        &format!("INSERT INTO {} (id) VALUES (?1)", quote_ident(table)),
        params![member.to_string()],
    )
    .map_err(|e| to_storage_err(format!("insert {member} into {table}: {e}")))?;
    Ok(())
}

/// Returns `false` if the member was not present.
pub fn remove_member(conn: &Connection, table: &str, member: &DatasetId) -> TgisResult<bool> {
    let removed = conn
        .execute(
            &format!("DELETE FROM {} WHERE id = ?1", quote_ident(table)),
            params![member.to_string()],
        )
        .map_err(|e| to_storage_err(format!("remove {member} from {table}: {e}")))?;
    Ok(removed > 0)
}

pub fn is_member(conn: &Connection, table: &str, member: &DatasetId) -> TgisResult<bool> {
    conn.prepare(&format!("SELECT 1 FROM {} WHERE id = ?1", quote_ident(table)))
        .and_then(|mut stmt| stmt.exists(params![member.to_string()]))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Member ids ordered by id.
pub fn list_members(conn: &Connection, table: &str) -> TgisResult<Vec<DatasetId>> {
    let mut stmt = conn
        .prepare(&format!("SELECT id FROM {} ORDER BY id", quote_ident(table)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut ids = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        ids.push(DatasetId::parse(&raw)?);
    }
    Ok(ids)
}

pub fn count_members(conn: &Connection, table: &str) -> TgisResult<i64> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn table_exists(conn: &Connection, table: &str) -> TgisResult<bool> {
    conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE")
        .and_then(|mut stmt| stmt.exists(params![table]))
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn catalogue_entry(conn: &Connection, table: &str) -> TgisResult<Option<RegisterTableRow>> {
    conn.query_row(
        "SELECT table_name, owner_kind, owner_id, member_kind
         FROM register_tables WHERE table_name = ?1 COLLATE NOCASE",
        params![table],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

fn owner_entry(
    conn: &Connection,
    owner_kind: DatasetType,
    owner_id: &DatasetId,
) -> TgisResult<Option<RegisterTableRow>> {
    conn.query_row(
        "SELECT table_name, owner_kind, owner_id, member_kind
         FROM register_tables WHERE owner_kind = ?1 AND owner_id = ?2",
        params![owner_kind.as_str(), owner_id.to_string()],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// All catalogued register tables ordered by name.
pub fn list_register_tables(conn: &Connection) -> TgisResult<Vec<RegisterTableRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT table_name, owner_kind, owner_id, member_kind
             FROM register_tables ORDER BY table_name",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(entries)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RegisterTableRow> {
    Ok(RegisterTableRow {
        table_name: row.get(0)?,
        owner_kind: row.get(1)?,
        owner_id: row.get(2)?,
        member_kind: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use tgis_core::models::{MapType, StdsType};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn id(s: &str) -> DatasetId {
        DatasetId::parse(s).unwrap()
    }

    #[test]
    fn create_add_remove() {
        let conn = setup();
        let owner = id("temp@PERMANENT");
        let t = create_register_table(
            &conn,
            "temp_PERMANENT_raster_register",
            StdsType::Strds.into(),
            &owner,
            MapType::Raster.into(),
        )
        .unwrap();
        assert_eq!(t, "temp_PERMANENT_raster_register");

        add_member(&conn, &t, &id("a@PERMANENT")).unwrap();
        add_member(&conn, &t, &id("b@PERMANENT")).unwrap();
        assert!(add_member(&conn, &t, &id("a@PERMANENT")).is_err());
        assert_eq!(count_members(&conn, &t).unwrap(), 2);
        assert!(remove_member(&conn, &t, &id("a@PERMANENT")).unwrap());
        assert!(!remove_member(&conn, &t, &id("a@PERMANENT")).unwrap());
        assert_eq!(list_members(&conn, &t).unwrap(), vec![id("b@PERMANENT")]);
    }

    #[test]
    fn owner_gets_its_table_back() {
        let conn = setup();
        let owner = id("temp@PERMANENT");
        let create = || {
            create_register_table(
                &conn,
                "temp_PERMANENT_raster_register",
                StdsType::Strds.into(),
                &owner,
                MapType::Raster.into(),
            )
            .unwrap()
        };
        assert_eq!(create(), create());
        assert_eq!(list_register_tables(&conn).unwrap().len(), 1);
    }

    #[test]
    fn underscore_split_names_get_distinct_tables() {
        let conn = setup();
        let table = "a_b_c_strds_register";
        let first = create_register_table(
            &conn,
            table,
            MapType::Raster.into(),
            &id("a_b@c"),
            StdsType::Strds.into(),
        )
        .unwrap();
        let second = create_register_table(
            &conn,
            table,
            MapType::Raster.into(),
            &id("a@b_c"),
            StdsType::Strds.into(),
        )
        .unwrap();
        assert_eq!(first, table);
        assert_eq!(second, "a_b_c_strds_register_1");
        add_member(&conn, &first, &id("s@c")).unwrap();
        assert_eq!(count_members(&conn, &second).unwrap(), 0);
    }

    #[test]
    fn names_differing_only_in_case_collide() {
        let conn = setup();
        let upper = create_register_table(
            &conn,
            "Temp_PERMANENT_raster_register",
            StdsType::Strds.into(),
            &id("Temp@PERMANENT"),
            MapType::Raster.into(),
        )
        .unwrap();
        let lower = create_register_table(
            &conn,
            "temp_PERMANENT_raster_register",
            StdsType::Strds.into(),
            &id("temp@PERMANENT"),
            MapType::Raster.into(),
        )
        .unwrap();
        assert_eq!(upper, "Temp_PERMANENT_raster_register");
        assert_eq!(lower, "temp_PERMANENT_raster_register_1");
        assert!(table_exists(&conn, "TEMP_permanent_RASTER_register").unwrap());
        assert_eq!(
            catalogue_entry(&conn, "TEMP_PERMANENT_RASTER_REGISTER")
                .unwrap()
                .unwrap()
                .owner_id,
            "Temp@PERMANENT"
        );
    }

    #[test]
    fn reserved_prefix_is_avoided() {
        let conn = setup();
        for (preferred, owner) in [
            ("sqlite_PERMANENT_strds_register", "sqlite@PERMANENT"),
            ("SQLite_Data_strds_register", "SQLite@Data"),
        ] {
            let table = create_register_table(
                &conn,
                preferred,
                MapType::Raster.into(),
                &id(owner),
                StdsType::Strds.into(),
            )
            .unwrap();
            assert_eq!(table, format!("tgis_{preferred}"));
            add_member(&conn, &table, &id("s@PERMANENT")).unwrap();
        }
    }

    #[test]
    fn avoids_dataset_tables() {
        let conn = setup();
        let table = create_register_table(
            &conn,
            "raster_base",
            MapType::Raster.into(),
            &id("x@y"),
            StdsType::Strds.into(),
        )
        .unwrap();
        assert_eq!(table, "raster_base_1");
        let index = free_register_name(&conn, "IDX_raster_base_mapset").unwrap();
        assert_eq!(index, "IDX_raster_base_mapset_1");
    }

    #[test]
    fn rename_moves_ownership() {
        let conn = setup();
        let t = create_register_table(
            &conn,
            "old_m_raster_register",
            StdsType::Strds.into(),
            &id("old@m"),
            MapType::Raster.into(),
        )
        .unwrap();
        add_member(&conn, &t, &id("a@m")).unwrap();

        let renamed = rename_register_table(&conn, &t, "new_m_raster_register", &id("new@m"))
            .unwrap();
        assert_eq!(renamed, "new_m_raster_register");
        assert!(!table_exists(&conn, &t).unwrap());
        assert_eq!(list_members(&conn, &renamed).unwrap(), vec![id("a@m")]);
        let entry = catalogue_entry(&conn, &renamed).unwrap().unwrap();
        assert_eq!(entry.owner_id, "new@m");
    }

    #[test]
    fn drop_clears_catalogue() {
        let conn = setup();
        let table = create_register_table(
            &conn,
            "s_m_vector_register",
            StdsType::Stvds.into(),
            &id("s@m"),
            MapType::Vector.into(),
        )
        .unwrap();
        assert_eq!(list_register_tables(&conn).unwrap().len(), 1);
        drop_register_table(&conn, &table).unwrap();
        assert!(!table_exists(&conn, &table).unwrap());
        assert!(list_register_tables(&conn).unwrap().is_empty());
    }
}
