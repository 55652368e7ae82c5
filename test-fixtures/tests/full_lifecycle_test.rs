//! Full lifecycle on a file-backed database:
//! create datasets -> register -> inspect topology -> update -> delete -> vacuum.

use std::sync::Arc;

use test_fixtures::{absolute, day, id, stds, strds, MapBuilder};
use tgis_core::config::{StorageConfig, TemporalConfig};
use tgis_core::models::{MapType, StdsType, TemporalRange, TemporalRelation, TemporalType};
use tgis_core::traits::ITemporalDatabase;
use tgis_storage::StorageEngine;
use tgis_temporal::topology::{check_temporal_topology, count_gaps, count_relations, map_time, MapTime};
use tgis_temporal::TemporalEngine;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open(config: &StorageConfig) -> TemporalEngine {
    let storage = Arc::new(StorageEngine::from_config(config).unwrap());
    TemporalEngine::new(storage, TemporalConfig::default())
}

/// Monthly rasters for the given (start month, end month) pairs of 2001.
fn monthly(engine: &TemporalEngine, months: &[(u32, u32)]) {
    for (i, (from, to)) in months.iter().enumerate() {
        let map = MapBuilder::new(MapType::Raster, &format!("temp_{i}"))
            .temporal(absolute(day(2001, *from, 1), day(2001, *to, 1)))
            .values(-5.0 + i as f64, 20.0 + i as f64)
            .build();
        engine.insert_map(&map).unwrap();
        engine
            .register_map(StdsType::Strds, &id("temperature"), map.id())
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn monthly_series_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        gisdbase: dir.path().to_path_buf(),
        location: "climate".to_string(),
        ..Default::default()
    };
    let engine = open(&config);
    engine.insert_stds(&strds("temperature")).unwrap();
    monthly(&engine, &[(1, 2), (2, 3), (3, 4), (5, 6)]);

    // Stage 1: derived metadata.
    let series = engine
        .select_stds(StdsType::Strds, &id("temperature"))
        .unwrap()
        .unwrap();
    assert_eq!(series.derived.number_of_maps, 4);
    assert_eq!(series.granularity.as_deref(), Some("1 month"));
    assert_eq!(
        series.derived.temporal_range,
        Some(TemporalRange::Absolute {
            start: day(2001, 1, 1),
            end: day(2001, 6, 1),
        })
    );
    assert_eq!(series.derived.min_min, Some(-5.0));
    assert_eq!(series.derived.max_max, Some(23.0));
    assert_eq!(series.derived.spatial, Some(test_fixtures::region()));

    // Stage 2: topology.
    let maps = engine
        .registered_maps(StdsType::Strds, &id("temperature"))
        .unwrap();
    assert_eq!(map_time(&maps), MapTime::Interval);
    assert_eq!(count_gaps(&maps), 1);
    assert!(check_temporal_topology(&maps));
    let relations = count_relations(&maps);
    assert_eq!(relations.get(&TemporalRelation::Follows), Some(&2));
    assert_eq!(relations.get(&TemporalRelation::After), Some(&1));

    // Stage 3: an overlapping update breaks the topology.
    let mut moved = maps[3].clone();
    moved.temporal = absolute(day(2001, 3, 15), day(2001, 4, 15));
    engine.update_map(&moved).unwrap();
    let maps = engine
        .registered_maps(StdsType::Strds, &id("temperature"))
        .unwrap();
    assert!(!check_temporal_topology(&maps));
    let series = engine
        .select_stds(StdsType::Strds, &id("temperature"))
        .unwrap()
        .unwrap();
    assert_eq!(
        series.derived.temporal_range,
        Some(TemporalRange::Absolute {
            start: day(2001, 1, 1),
            end: day(2001, 4, 15),
        })
    );

    // Stage 4: delete a map, then the dataset.
    assert!(engine.delete_map(MapType::Raster, &id("temp_0")).unwrap());
    assert_eq!(
        engine
            .registered_maps(StdsType::Strds, &id("temperature"))
            .unwrap()
            .len(),
        3
    );
    assert!(engine
        .delete_stds(StdsType::Strds, &id("temperature"))
        .unwrap());

    // Stage 5: only the map tables are left and all are empty.
    assert_eq!(engine.register_table_count().unwrap(), 3);
    let dropped = engine.drop_empty_register_tables().unwrap();
    assert_eq!(dropped.len(), 3);
    assert_eq!(engine.register_table_count().unwrap(), 0);
    drop(engine);

    // Stage 6: the state survives a reopen.
    let engine = open(&config);
    assert_eq!(engine.list_maps(MapType::Raster, None).unwrap().len(), 3);
    assert!(engine
        .list_stds(StdsType::Strds, None)
        .unwrap()
        .is_empty());
    assert_eq!(engine.storage().schema_version().unwrap(), 2);
}

#[test]
fn volume_series_tracks_vertical_resolution() {
    let engine = TemporalEngine::open_in_memory().unwrap();
    engine
        .insert_stds(&stds(StdsType::Str3ds, "soil", TemporalType::Absolute))
        .unwrap();
    for i in 0..3u32 {
        let map = MapBuilder::new(MapType::Raster3d, &format!("soil_{i}"))
            .temporal(absolute(day(2001, 1, 1 + i), day(2001, 1, 2 + i)))
            .values(0.0, f64::from(i))
            .build();
        engine.insert_map(&map).unwrap();
        engine
            .register_map(StdsType::Str3ds, &id("soil"), map.id())
            .unwrap();
    }

    let series = engine
        .select_stds(StdsType::Str3ds, &id("soil"))
        .unwrap()
        .unwrap();
    assert_eq!(series.derived.number_of_maps, 3);
    assert_eq!(series.derived.tbres_min, Some(10.0));
    assert_eq!(series.derived.tbres_max, Some(10.0));
    assert_eq!(series.derived.max_min, Some(0.0));
    assert_eq!(series.derived.max_max, Some(2.0));
    assert_eq!(series.granularity.as_deref(), Some("1 day"));
}
