//! Command-line entry point: binds a captured feed snapshot, harvests its
//! media into a RON manifest, and optionally sweeps the feed afterwards.

mod config;
mod report;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use engine_logging::{engine_error, engine_info, LogDestination};
use log::LevelFilter;
use tokio_util::sync::CancellationToken;

use favesweep_core::HarvestMode;
use favesweep_engine::{
    AnalysisService, HarvestEngine, HttpAnalysisClient, HttpRemovalClient, LogProgressSink,
    OfflineAnalysis, OfflineRemoval, RemovalService, ServiceSettings, SnapshotSurface, SweepEngine,
};

const USAGE: &str = "Usage: favesweep <snapshot.html> [--mode images|videos|all] [--sweep] \
[--config <path>] [--log terminal|file|both]";

const MANIFEST_FILENAME: &str = "favesweep_manifest.ron";

struct Cli {
    snapshot: PathBuf,
    config: Option<PathBuf>,
    /// None when `--mode` was not given; the config file may still name one.
    mode: Option<HarvestMode>,
    sweep: bool,
    log: LogDestination,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match parse_args(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    engine_logging::initialize(cli.log, LevelFilter::Info);

    let app_config = config::load(cli.config.as_deref());
    let settings = app_config.run_settings();
    let mode = cli
        .mode
        .or_else(|| app_config.harvest_mode())
        .unwrap_or_default();

    let html = match fs::read_to_string(&cli.snapshot) {
        Ok(html) => html,
        Err(err) => {
            engine_error!("Failed to read snapshot {:?}: {}", cli.snapshot, err);
            return ExitCode::FAILURE;
        }
    };
    let surface = match SnapshotSurface::from_html(&html, &settings.selectors) {
        Ok(surface) => surface,
        Err(err) => {
            engine_error!("Failed to bind snapshot {:?}: {}", cli.snapshot, err);
            return ExitCode::FAILURE;
        }
    };
    engine_info!(
        "Bound snapshot {:?}: {} items, surface {}",
        cli.snapshot,
        surface.item_count(),
        surface.surface_label()
    );

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let analysis: Box<dyn AnalysisService> = match &app_config.service_base_url {
        Some(base_url) => {
            match HttpAnalysisClient::new(
                base_url,
                app_config.service_token.as_deref(),
                &ServiceSettings::default(),
            ) {
                Ok(client) => Box::new(client),
                Err(err) => {
                    engine_error!("Cannot build analysis client: {}", err);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => Box::new(OfflineAnalysis),
    };

    let sink = LogProgressSink;
    let harvester = HarvestEngine::new(&surface, analysis.as_ref(), &sink, &settings);
    let records = match harvester.run(mode, &cancel).await {
        Ok(records) => records,
        Err(err) => {
            engine_error!("Harvest failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let manifest_path = PathBuf::from(MANIFEST_FILENAME);
    if let Err(err) = report::write_manifest(&manifest_path, mode, &records) {
        engine_error!("Failed to write manifest to {:?}: {}", manifest_path, err);
        return ExitCode::FAILURE;
    }
    engine_info!(
        "Harvested {} {} records into {:?}",
        records.len(),
        report::mode_label(mode),
        manifest_path
    );

    if cli.sweep {
        let removal: Box<dyn RemovalService> = match &app_config.service_base_url {
            Some(base_url) => {
                match HttpRemovalClient::new(
                    base_url,
                    app_config.service_token.as_deref(),
                    &ServiceSettings::default(),
                ) {
                    Ok(client) => Box::new(client),
                    Err(err) => {
                        engine_error!("Cannot build removal client: {}", err);
                        return ExitCode::FAILURE;
                    }
                }
            }
            None => Box::new(OfflineRemoval::new()),
        };

        let sweeper = SweepEngine::new(&surface, removal.as_ref(), &sink, &settings);
        let total = sweeper.run(&cancel).await;
        engine_info!("Sweep took {} actions", total);
    }

    ExitCode::SUCCESS
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            engine_info!("Ctrl-C received, stopping at the next checkpoint");
            cancel.cancel();
        }
    });
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Cli, String> {
    let mut snapshot = None;
    let mut config = None;
    let mut mode = None;
    let mut sweep = false;
    let mut log = LogDestination::Terminal;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => {
                mode = Some(match args.next().ok_or("--mode needs a value")?.as_str() {
                    "images" => HarvestMode::Images,
                    "videos" => HarvestMode::Videos,
                    "all" => HarvestMode::All,
                    other => return Err(format!("Unknown mode {other:?}")),
                });
            }
            "--sweep" => sweep = true,
            "--config" => {
                config = Some(PathBuf::from(args.next().ok_or("--config needs a path")?));
            }
            "--log" => {
                log = match args.next().ok_or("--log needs a value")?.as_str() {
                    "terminal" => LogDestination::Terminal,
                    "file" => LogDestination::File,
                    "both" => LogDestination::Both,
                    other => return Err(format!("Unknown log destination {other:?}")),
                };
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if snapshot.is_none() && !other.starts_with('-') => {
                snapshot = Some(PathBuf::from(other));
            }
            other => return Err(format!("Unknown argument {other:?}")),
        }
    }

    Ok(Cli {
        snapshot: snapshot.ok_or("Missing snapshot path")?,
        config,
        mode,
        sweep,
        log,
    })
}
