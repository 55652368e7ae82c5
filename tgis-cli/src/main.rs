//! `tgis`: command line front end for the temporal GIS metadata store.

mod commands;
mod context;
mod error;
mod logging;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    add, create, info, init, list, register, relation, remove, rename, shift, topology, vacuum,
};
use context::{Context, Overrides};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tgis", version, about = "Temporal metadata store for GIS maps")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "TGIS_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, bypassing the GIS database/location layout
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// GIS database directory
    #[arg(long, global = true, env = "GISDBASE")]
    gisdbase: Option<PathBuf>,

    /// Location below the GIS database directory
    #[arg(long, global = true, env = "LOCATION_NAME")]
    location: Option<String>,

    /// Current mapset, used for unqualified names
    #[arg(long, global = true, env = "MAPSET", default_value = "PERMANENT")]
    mapset: String,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the temporal database if needed and show its state
    Init,
    /// Create a space-time dataset
    Create(create::CreateArgs),
    /// Add a map with its temporal and spatial extent
    Add(add::AddArgs),
    /// Register maps in a space-time dataset
    Register(register::RegisterArgs),
    /// Remove maps from a space-time dataset
    Unregister(register::MapListArgs),
    /// Delete maps or space-time datasets
    Remove(remove::RemoveArgs),
    /// Show a map or space-time dataset
    Info(info::InfoArgs),
    /// List datasets, or the maps of a space-time dataset
    List(list::ListArgs),
    /// Allen relation between two maps
    Relation(relation::RelationArgs),
    /// Temporal topology of a space-time dataset
    Topology(topology::TopologyArgs),
    /// Move the maps of a space-time dataset in time
    Shift(shift::ShiftArgs),
    /// Close the gaps between the maps of a space-time dataset
    Snap(shift::SnapArgs),
    /// Rename a space-time dataset
    Rename(rename::RenameArgs),
    /// Drop empty register tables
    Vacuum,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = context::load_config(cli.config.as_deref())?;
    context::apply_overrides(
        &mut config,
        &Overrides {
            gisdbase: cli.gisdbase,
            location: cli.location,
        },
    );
    logging::init_logging(&config.observability, cli.verbose)?;

    let ctx = Context::open(config, cli.db.as_deref(), cli.mapset)?;
    match cli.command {
        Command::Init => init::run(&ctx),
        Command::Create(args) => create::run(&ctx, args),
        Command::Add(args) => add::run(&ctx, args),
        Command::Register(args) => register::run_register(&ctx, args),
        Command::Unregister(args) => register::run_unregister(&ctx, args),
        Command::Remove(args) => remove::run(&ctx, args),
        Command::Info(args) => info::run(&ctx, args),
        Command::List(args) => list::run(&ctx, args),
        Command::Relation(args) => relation::run(&ctx, args),
        Command::Topology(args) => topology::run(&ctx, args),
        Command::Shift(args) => shift::run_shift(&ctx, args),
        Command::Snap(args) => shift::run_snap(&ctx, args),
        Command::Rename(args) => rename::run(&ctx, args),
        Command::Vacuum => vacuum::run(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tgis_core::models::{MapType, RelativeTime, StdsType, TemporalExtent, TimePoint};
    use tgis_core::traits::ITemporalDatabase;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_register_with_map_list() {
        let cli = Cli::try_parse_from([
            "tgis", "register", "--input", "precip", "--type", "strds", "a,b", "c",
        ])
        .unwrap();
        match cli.command {
            Command::Register(args) => {
                assert_eq!(args.target.maps, vec!["a", "b", "c"]);
                assert_eq!(args.target.stds_type, StdsType::Strds);
                assert_eq!(args.assignment().unwrap(), None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn register_with_monthly_intervals() {
        let cli = Cli::try_parse_from([
            "tgis", "register", "-i", "precip", "--start", "2001-01-01", "--increment",
            "1 month", "--interval", "a,b",
        ])
        .unwrap();
        let Command::Register(args) = cli.command else {
            panic!("expected register");
        };
        let assignment = args.assignment().unwrap().unwrap();
        assert!(matches!(assignment.start, TimePoint::Absolute(_)));
        assert_eq!(assignment.increment.as_deref(), Some("1 month"));
        assert!(assignment.interval);

        let clash = Cli::try_parse_from([
            "tgis", "register", "-i", "precip", "--start", "1", "--end", "4", "--increment", "1",
            "a",
        ]);
        assert!(clash.is_err());
        let dangling = Cli::try_parse_from(["tgis", "register", "-i", "precip", "--interval", "a"]);
        assert!(dangling.is_err());
    }

    #[test]
    fn add_needs_start_or_rel_start() {
        let err = Cli::try_parse_from([
            "tgis", "add", "elev", "--north", "1", "--south", "0", "--east", "1", "--west", "0",
        ]);
        assert!(err.is_err());
        let both = Cli::try_parse_from([
            "tgis", "add", "elev", "--start", "2001-01-01", "--rel-start", "1", "--north", "1",
            "--south", "0", "--east", "1", "--west", "0",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn relative_time_is_whole_numbers() {
        let fractional = Cli::try_parse_from([
            "tgis", "add", "obs", "--rel-start", "1.5", "--north", "1", "--south", "0", "--east",
            "1", "--west", "0",
        ]);
        assert!(fractional.is_err());

        let cli = Cli::try_parse_from([
            "tgis", "add", "obs", "--type", "vector", "--rel-start", "-2", "--rel-end", "3",
            "--unit", "months", "--north", "1", "--south", "0", "--east", "1", "--west", "0",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let ctx = Context {
            engine: tgis_temporal::TemporalEngine::open_in_memory().unwrap(),
            config: tgis_core::TgisConfig::default(),
            mapset: "PERMANENT".to_string(),
        };
        let map = args.build(&ctx).unwrap();
        assert_eq!(
            map.temporal,
            TemporalExtent::from(RelativeTime::new(-2, 3, "months"))
        );
    }

    #[test]
    fn parses_timeline_edits() {
        let cli = Cli::try_parse_from(["tgis", "shift", "precip", "-g", "-1 day"]).unwrap();
        match cli.command {
            Command::Shift(args) => assert_eq!(args.granularity, "-1 day"),
            other => panic!("unexpected command {other:?}"),
        }
        let cli = Cli::try_parse_from(["tgis", "snap", "obs", "--type", "stvds"]).unwrap();
        assert!(matches!(cli.command, Command::Snap(ref a) if a.stds_type == StdsType::Stvds));
        let cli = Cli::try_parse_from(["tgis", "rename", "precip", "rainfall"]).unwrap();
        assert!(matches!(cli.command, Command::Rename(ref a) if a.to == "rainfall"));
        assert!(Cli::try_parse_from(["tgis", "list", "--gaps"]).is_err());
    }

    #[test]
    fn rename_keeps_the_source_mapset() {
        let ctx = Context {
            engine: tgis_temporal::TemporalEngine::open_in_memory().unwrap(),
            config: tgis_core::TgisConfig::default(),
            mapset: "user1".to_string(),
        };
        create::run(
            &ctx,
            create::CreateArgs {
                name: "precip@PERMANENT".to_string(),
                stds_type: StdsType::Strds,
                temporal_type: tgis_core::models::TemporalType::Absolute,
                semantic_type: None,
                title: None,
                description: None,
                granularity: None,
                unit: None,
            },
        )
        .unwrap();
        rename::run(
            &ctx,
            rename::RenameArgs {
                from: "precip@PERMANENT".to_string(),
                to: "rainfall".to_string(),
                stds_type: StdsType::Strds,
            },
        )
        .unwrap();
        let renamed = tgis_core::models::DatasetId::new("rainfall", "PERMANENT").unwrap();
        assert!(ctx
            .engine
            .select_stds(StdsType::Strds, &renamed)
            .unwrap()
            .is_some());
    }

    #[test]
    fn add_builds_a_raster_from_region() {
        let cli = Cli::try_parse_from([
            "tgis", "add", "elev", "--start", "2001-01-01", "--end", "2001-02-01", "--north",
            "100", "--south", "0", "--east", "200", "--west", "0", "--nsres", "10", "--ewres",
            "10", "--min", "-3.5", "--max", "12",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let ctx = Context {
            engine: tgis_temporal::TemporalEngine::open_in_memory().unwrap(),
            config: tgis_core::TgisConfig::default(),
            mapset: "PERMANENT".to_string(),
        };
        let map = args.build(&ctx).unwrap();
        assert_eq!(map.map_type, MapType::Raster);
        assert_eq!(map.id().to_string(), "elev@PERMANENT");
        match &map.metadata {
            tgis_core::models::MapMetadata::Raster(meta) => {
                assert_eq!(meta.rows, Some(10));
                assert_eq!(meta.cols, Some(20));
                assert_eq!(meta.min, Some(-3.5));
            }
            other => panic!("unexpected metadata {other:?}"),
        }

        add::run(&ctx, args).unwrap();
        assert!(ctx
            .engine
            .is_map_in_db(MapType::Raster, &ctx.qualify("elev").unwrap())
            .unwrap());
    }

    #[test]
    fn file_database_via_db_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tgis.db");
        let ctx = Context::open(
            tgis_core::TgisConfig::default(),
            Some(path.as_path()),
            "PERMANENT".to_string(),
        )
        .unwrap();
        assert!(path.exists());
        assert_eq!(ctx.engine.storage().schema_version().unwrap(), 2);
    }
}
