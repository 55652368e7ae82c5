//! Integration tests for the SQLite storage layer.
//!
//! Exercises the table families through the raw query modules, in memory
//! and file-backed.

use chrono::Duration;
use tempfile::TempDir;

use test_fixtures::{absolute, day, id, relative, MapBuilder};
use tgis_core::models::{
    DatasetType, MapMetadata, MapType, Projection, SpatialExtent, StdsType, TemporalType,
};
use tgis_core::TgisError;
use tgis_storage::migrations::{current_version, LATEST_VERSION};
use tgis_storage::queries::{
    aggregate_ops, base_ops, extent_ops, map_crud, register_ops, stds_crud,
};
use tgis_storage::schema::stds_register_table;
use tgis_storage::StorageEngine;

fn setup() -> StorageEngine {
    StorageEngine::open_in_memory().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Engine and migrations
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn in_memory_engine_is_migrated() {
    let engine = setup();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
    assert!(engine.path().is_none());
}

#[test]
fn reopening_a_file_does_not_rerun_migrations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tgis.db");
    {
        let engine = StorageEngine::open(&path, 2, 5000).unwrap();
        assert!(engine.pool().is_wal_mode());
        assert_eq!(engine.pool().reader_count(), 2);
    }
    let engine = StorageEngine::open(&path, 1, 5000).unwrap();
    let version = engine.with_writer(|conn| current_version(conn)).unwrap();
    assert_eq!(version, LATEST_VERSION);
}

#[test]
fn readers_see_committed_writes() {
    let dir = TempDir::new().unwrap();
    let engine = StorageEngine::open(&dir.path().join("tgis.db"), 2, 5000).unwrap();
    let map = MapBuilder::new(MapType::Raster, "elev").build();

    engine
        .with_transaction(|conn| map_crud::insert_map(conn, &map))
        .unwrap();

    for _ in 0..4 {
        let found = engine
            .with_reader(|conn| map_crud::select_map(conn, MapType::Raster, map.id()))
            .unwrap();
        assert_eq!(found.as_ref().map(|m| m.id()), Some(map.id()));
    }
}

#[test]
fn failed_transaction_rolls_back() {
    let engine = setup();
    let map = MapBuilder::new(MapType::Raster, "elev").build();

    let result: Result<(), TgisError> = engine.with_transaction(|conn| {
        map_crud::insert_map(conn, &map)?;
        Err(TgisError::ValidationError("abort".to_string()))
    });
    assert!(result.is_err());

    let exists = engine
        .with_reader(|conn| base_ops::exists(conn, MapType::Raster.into(), map.id()))
        .unwrap();
    assert!(!exists);
}

// ═══════════════════════════════════════════════════════════════════════════
// Map rows
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn map_roundtrip_all_kinds() {
    let engine = setup();
    for map_type in MapType::ALL {
        let map = MapBuilder::new(map_type, "m").values(1.5, 9.0).build();
        engine
            .with_transaction(|conn| map_crud::insert_map(conn, &map))
            .unwrap();
        let back = engine
            .with_reader(|conn| map_crud::select_map(conn, map_type, map.id()))
            .unwrap()
            .unwrap();
        assert_eq!(back.temporal, map.temporal);
        assert_eq!(back.spatial, map.spatial);
        assert_eq!(back.metadata, map.metadata);
        assert_eq!(back.base.revision, 1);
        assert!(back.stds_register.is_none());
    }
}

#[test]
fn relative_map_roundtrip() {
    let engine = setup();
    let map = MapBuilder::new(MapType::Vector, "points")
        .temporal(relative(5, 8, "days"))
        .build();
    engine
        .with_transaction(|conn| map_crud::insert_map(conn, &map))
        .unwrap();
    let back = engine
        .with_reader(|conn| map_crud::select_map(conn, MapType::Vector, map.id()))
        .unwrap()
        .unwrap();
    assert_eq!(back.temporal, relative(5, 8, "days"));
    assert_eq!(back.temporal_type(), TemporalType::Relative);
}

#[test]
fn duplicate_insert_fails() {
    let engine = setup();
    let map = MapBuilder::new(MapType::Raster, "elev").build();
    engine
        .with_transaction(|conn| map_crud::insert_map(conn, &map))
        .unwrap();
    let err = engine
        .with_transaction(|conn| map_crud::insert_map(conn, &map))
        .unwrap_err();
    assert!(matches!(err, TgisError::StorageError(_)));
}

#[test]
fn select_missing_is_none() {
    let engine = setup();
    let found = engine
        .with_reader(|conn| map_crud::select_map(conn, MapType::Raster, &id("nothing")))
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn update_rewrites_extents() {
    let engine = setup();
    let mut map = MapBuilder::new(MapType::Raster, "elev").build();
    engine
        .with_transaction(|conn| map_crud::insert_map(conn, &map))
        .unwrap();

    map.temporal = absolute(day(2002, 1, 1), day(2002, 2, 1));
    map.spatial = SpatialExtent::new_2d(50.0, 40.0, 10.0, 0.0, Projection::LL);
    map.base.revision = 2;
    engine
        .with_transaction(|conn| map_crud::update_map(conn, &map))
        .unwrap();

    let back = engine
        .with_reader(|conn| map_crud::select_map(conn, MapType::Raster, map.id()))
        .unwrap()
        .unwrap();
    assert_eq!(back.temporal, map.temporal);
    assert_eq!(back.spatial.proj, Projection::LL);
    assert_eq!(back.base.revision, 2);
}

#[test]
fn update_missing_is_not_found() {
    let engine = setup();
    let map = MapBuilder::new(MapType::Raster, "ghost").build();
    let err = engine
        .with_transaction(|conn| map_crud::update_map(conn, &map))
        .unwrap_err();
    assert!(matches!(err, TgisError::DatasetNotFound { .. }));
}

#[test]
fn delete_cascades_to_dependent_rows() {
    let engine = setup();
    let map = MapBuilder::new(MapType::Raster3d, "vol").build();
    engine
        .with_transaction(|conn| map_crud::insert_map(conn, &map))
        .unwrap();
    assert!(engine
        .with_transaction(|conn| map_crud::delete_map(conn, MapType::Raster3d, map.id()))
        .unwrap());

    let orphans: i64 = engine
        .with_reader(|conn| {
            conn.query_row(
                "SELECT (SELECT COUNT(*) FROM raster3d_absolute_time)
                      + (SELECT COUNT(*) FROM raster3d_spatial_extent)
                      + (SELECT COUNT(*) FROM raster3d_metadata)",
                [],
                |row| row.get(0),
            )
            .map_err(|e| tgis_storage::to_storage_err(e.to_string()))
        })
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn list_is_ordered_and_filtered() {
    let engine = setup();
    for (name, mapset) in [("b", "PERMANENT"), ("a", "PERMANENT"), ("c", "user1")] {
        let map = MapBuilder::new(MapType::Raster, name).mapset(mapset).build();
        engine
            .with_transaction(|conn| map_crud::insert_map(conn, &map))
            .unwrap();
    }
    let all = engine
        .with_reader(|conn| base_ops::list_ids(conn, MapType::Raster.into(), None))
        .unwrap();
    let names: Vec<_> = all.iter().map(|i| i.name().to_string()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let user1 = engine
        .with_reader(|conn| base_ops::list_ids(conn, MapType::Raster.into(), Some("user1")))
        .unwrap();
    assert_eq!(user1.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Space-time dataset rows and aggregates
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn stds_roundtrip_without_maps() {
    let engine = setup();
    let mut stds = test_fixtures::strds("precip");
    stds.granularity = Some("1 day".to_string());
    engine
        .with_transaction(|conn| stds_crud::insert_stds(conn, &stds))
        .unwrap();
    let back = engine
        .with_reader(|conn| stds_crud::select_stds(conn, StdsType::Strds, stds.id()))
        .unwrap()
        .unwrap();
    assert_eq!(back.semantic_type, "mean");
    assert_eq!(back.granularity.as_deref(), Some("1 day"));
    assert_eq!(back.title, stds.title);
    assert_eq!(back.derived.number_of_maps, 0);
    assert!(back.derived.temporal_range.is_none());
}

#[test]
fn aggregates_follow_register_table() {
    let engine = setup();
    let stds = test_fixtures::strds("precip");
    let preferred = stds_register_table(StdsType::Strds, stds.id());
    let maps: Vec<_> = (0..3)
        .map(|i| {
            let start = day(2001, 1, 1) + Duration::days(i);
            MapBuilder::new(MapType::Raster, &format!("p{i}"))
                .temporal(absolute(start, start + Duration::days(1)))
                .values(i as f64, 10.0 + i as f64)
                .build()
        })
        .collect();

    let table = engine
        .with_transaction(|conn| {
            stds_crud::insert_stds(conn, &stds)?;
            let table = register_ops::create_register_table(
                conn,
                &preferred,
                DatasetType::Stds(StdsType::Strds),
                stds.id(),
                DatasetType::Map(MapType::Raster),
            )?;
            for map in &maps {
                map_crud::insert_map(conn, map)?;
                register_ops::add_member(conn, &table, map.id())?;
            }
            Ok(table)
        })
        .unwrap();

    let derived = engine
        .with_reader(|conn| {
            aggregate_ops::compute_derived(
                conn,
                StdsType::Strds,
                TemporalType::Absolute,
                Some(&table),
            )
        })
        .unwrap();
    assert_eq!(derived.number_of_maps, 3);
    assert_eq!(derived.min_min, Some(0.0));
    assert_eq!(derived.max_max, Some(12.0));
    assert_eq!(derived.nsres_min, Some(10.0));
    match derived.temporal_range {
        Some(tgis_core::models::TemporalRange::Absolute { start, end }) => {
            assert_eq!(start, day(2001, 1, 1));
            assert_eq!(end, day(2001, 1, 4));
        }
        other => panic!("unexpected range {other:?}"),
    }
    assert_eq!(derived.spatial, Some(test_fixtures::region()));
}

#[test]
fn relative_dataset_keeps_its_unit() {
    let engine = setup();
    let stds = test_fixtures::stds(StdsType::Stvds, "tracks", TemporalType::Relative);
    let table = engine
        .with_transaction(|conn| {
            stds_crud::insert_stds(conn, &stds)?;
            extent_ops::set_stds_unit(conn, StdsType::Stvds, stds.id(), "months")?;
            let table = register_ops::create_register_table(
                conn,
                &stds_register_table(StdsType::Stvds, stds.id()),
                DatasetType::Stds(StdsType::Stvds),
                stds.id(),
                DatasetType::Map(MapType::Vector),
            )?;
            for (i, (start, end)) in [(1, 3), (6, 6)].into_iter().enumerate() {
                let map = MapBuilder::new(MapType::Vector, &format!("t{i}"))
                    .temporal(relative(start, end, "months"))
                    .build();
                map_crud::insert_map(conn, &map)?;
                register_ops::add_member(conn, &table, map.id())?;
            }
            Ok(table)
        })
        .unwrap();

    let loaded = engine
        .with_reader(|conn| stds_crud::select_stds(conn, StdsType::Stvds, stds.id()))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.relative_unit.as_deref(), Some("months"));
    let derived = engine
        .with_reader(|conn| {
            aggregate_ops::compute_derived(
                conn,
                StdsType::Stvds,
                TemporalType::Relative,
                Some(&table),
            )
        })
        .unwrap();
    assert_eq!(
        derived.temporal_range,
        Some(tgis_core::models::TemporalRange::Relative { start: 1, end: 6 })
    );

    // Editing the description does not clear the unit.
    let mut edited = loaded.clone();
    edited.description = Some("gps tracks".to_string());
    edited.relative_unit = None;
    engine
        .with_transaction(|conn| stds_crud::update_stds(conn, &edited))
        .unwrap();
    let reloaded = engine
        .with_reader(|conn| stds_crud::select_stds(conn, StdsType::Stvds, stds.id()))
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.relative_unit.as_deref(), Some("months"));
    assert_eq!(reloaded.description.as_deref(), Some("gps tracks"));
}

#[test]
fn vector_metadata_has_no_values() {
    let map = MapBuilder::new(MapType::Vector, "roads").values(0.0, 1.0).build();
    assert!(matches!(map.metadata, MapMetadata::Vector(_)));
}
