use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use stackview::cli::Args;
use stackview::config::{self, PathConfig};
use stackview::entities::Session;
use stackview::payload;
use stackview::runner::{self, ViewerOptions};

/// Initialize env_logger: console by default, file with `--log [FILE]`.
fn init_logging(args: &Args, path_config: &PathConfig) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .clone()
            .unwrap_or_else(|| config::data_file(config::LOG_FILE, path_config));
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .filter_module("eframe", log::LevelFilter::Info)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info)
            .filter_module("eframe", log::LevelFilter::Info)
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {:#}", e);
    }
    init_logging(&args, &path_config)?;

    info!("stackview {} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Command-line args: {:?}", args);

    let (arrays, titles) = match &args.payload {
        Some(path) => {
            info!("Payload: {}", path.display());
            payload::take_payload(path).with_context(|| format!("Failed to read payload {}", path.display()))?
        }
        None => {
            info!("No payload given, opening demo stacks");
            runner::demo_arrays()
        }
    };
    let session = Session::with_arrays(arrays, titles).context("Invalid arrays")?;

    let options = ViewerOptions {
        start_frame: args.start_frame.unwrap_or(0),
        autoplay: args.autoplay,
        fps: args.fps,
        sync_views: args.sync_views,
        paths: path_config,
        ..Default::default()
    };
    runner::run_viewer(session, options)?;

    info!("Viewer closed");
    Ok(())
}
