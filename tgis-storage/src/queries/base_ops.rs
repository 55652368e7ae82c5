//! `<kind>_base` rows: identity, creator, timestamps, revision.

use rusqlite::{params, Connection, OptionalExtension};

use tgis_core::errors::TgisResult;
use tgis_core::models::{DatasetBase, DatasetId, DatasetType, TemporalType};

use super::{format_time, parse_time};
use crate::schema::base_table;
use crate::to_storage_err;

/// A decoded base row.
#[derive(Debug, Clone)]
pub struct BaseRow {
    pub base: DatasetBase,
    pub temporal_type: TemporalType,
    /// Only set for space-time datasets.
    pub semantic_type: Option<String>,
}

pub fn insert_base(
    conn: &Connection,
    kind: DatasetType,
    base: &DatasetBase,
    temporal_type: TemporalType,
    semantic_type: Option<&str>,
) -> TgisResult<()> {
    let table = base_table(kind);
    let id = base.id.to_string();
    let creation = format_time(&base.creation_time);
    let modification = format_time(&base.modification_time);

    let inserted = if kind.is_map() {
        conn.execute(
            &format!(
                "INSERT INTO {table} (id, name, mapset, creator, temporal_type,
                    creation_time, modification_time, revision)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                id,
                base.id.name(),
                base.id.mapset(),
                base.creator,
                temporal_type.as_str(),
                creation,
                modification,
                base.revision,
            ],
        )
    } else {
        conn.execute(
            &format!(
                "INSERT INTO {table} (id, name, mapset, creator, temporal_type, semantic_type,
                    creation_time, modification_time, revision)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                id,
                base.id.name(),
                base.id.mapset(),
                base.creator,
                temporal_type.as_str(),
                semantic_type.unwrap_or("mean"),
                creation,
                modification,
                base.revision,
            ],
        )
    };
    inserted.map_err(|e| to_storage_err(format!("insert {table} {id}: {e}")))?;
    Ok(())
}

pub fn select_base(
    conn: &Connection,
    kind: DatasetType,
    id: &DatasetId,
) -> TgisResult<Option<BaseRow>> {
    let table = base_table(kind);
    let semantic = if kind.is_map() {
        "NULL"
    } else {
        "semantic_type"
    };
    let row = conn
        .query_row(
            &format!(
                "SELECT creator, temporal_type, {semantic}, creation_time,
                        modification_time, revision
                 FROM {table} WHERE id = ?1"
            ),
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((creator, temporal_type, semantic_type, created, modified, revision)) = row else {
        return Ok(None);
    };

    Ok(Some(BaseRow {
        base: DatasetBase {
            id: id.clone(),
            creator,
            creation_time: parse_time(&created)?,
            modification_time: parse_time(&modified)?,
            revision,
        },
        temporal_type: temporal_type.parse()?,
        semantic_type,
    }))
}

/// Write creator, modification time and revision. Identity and temporal
/// type are never rewritten.
pub fn update_base(
    conn: &Connection,
    kind: DatasetType,
    base: &DatasetBase,
    semantic_type: Option<&str>,
) -> TgisResult<()> {
    let table = base_table(kind);
    let id = base.id.to_string();
    let modification = format_time(&base.modification_time);
    let changed = match semantic_type {
        Some(semantic) if !kind.is_map() => conn.execute(
            &format!(
                "UPDATE {table} SET creator = ?2, modification_time = ?3, revision = ?4,
                    semantic_type = ?5
                 WHERE id = ?1"
            ),
            params![id, base.creator, modification, base.revision, semantic],
        ),
        _ => conn.execute(
            &format!(
                "UPDATE {table} SET creator = ?2, modification_time = ?3, revision = ?4
                 WHERE id = ?1"
            ),
            params![id, base.creator, modification, base.revision],
        ),
    }
    .map_err(|e| to_storage_err(format!("update {table} {id}: {e}")))?;

    if changed == 0 {
        return Err(tgis_core::TgisError::DatasetNotFound { id });
    }
    Ok(())
}

/// Delete the base row; extent and metadata rows follow by cascade.
pub fn delete_base(conn: &Connection, kind: DatasetType, id: &DatasetId) -> TgisResult<bool> {
    let table = base_table(kind);
    let deleted = conn
        .execute(
            &format!("DELETE FROM {table} WHERE id = ?1"),
            params![id.to_string()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted > 0)
}

pub fn exists(conn: &Connection, kind: DatasetType, id: &DatasetId) -> TgisResult<bool> {
    let table = base_table(kind);
    conn.prepare(&format!("SELECT 1 FROM {table} WHERE id = ?1"))
        .and_then(|mut stmt| stmt.exists(params![id.to_string()]))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Ids of one kind ordered by name, optionally restricted to a mapset.
pub fn list_ids(
    conn: &Connection,
    kind: DatasetType,
    mapset: Option<&str>,
) -> TgisResult<Vec<DatasetId>> {
    let table = base_table(kind);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT name, mapset FROM {table}
             WHERE ?1 IS NULL OR mapset = ?1
             ORDER BY name, mapset"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![mapset], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut ids = Vec::new();
    for row in rows {
        let (name, mapset) = row.map_err(|e| to_storage_err(e.to_string()))?;
        ids.push(DatasetId::new(name, mapset)?);
    }
    Ok(ids)
}
