use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Arrays: ndarray 0.16 (f32)\n",
    "Target: ",
    std::env::consts::ARCH,
    "-",
    std::env::consts::OS
);

/// Synchronized viewer for stacks of 3-D (time, y, x) arrays
#[derive(Parser, Debug, Default)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Open arrays from a payload file written by the embedding API (deleted after reading)
    #[arg(long = "payload", value_name = "FILE")]
    pub payload: Option<PathBuf>,

    /// Start frame number (0-based)
    #[arg(long = "frame", value_name = "N")]
    pub start_frame: Option<usize>,

    /// Playback speed in frames per second (1-100)
    #[arg(long = "fps", value_name = "N", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub fps: Option<u32>,

    /// Auto-play on startup
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Synchronize pan/zoom between docks (`--sync-views false` turns a saved setting off)
    #[arg(
        long = "sync-views",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub sync_views: Option<bool>,

    /// Enable debug logging to file (default: stackview.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let args = Args::try_parse_from([
            "stackview",
            "--payload",
            "/tmp/p.json",
            "--frame",
            "7",
            "--fps",
            "30",
            "-a",
            "--sync-views",
            "-vv",
            "-l",
        ])
        .unwrap();
        assert_eq!(args.payload, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(args.start_frame, Some(7));
        assert_eq!(args.fps, Some(30));
        assert!(args.autoplay);
        assert_eq!(args.sync_views, Some(true));
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.log_file, Some(None));
    }

    #[test]
    fn rejects_out_of_range_fps() {
        assert!(Args::try_parse_from(["stackview", "--fps", "0"]).is_err());
        assert!(Args::try_parse_from(["stackview", "--fps", "101"]).is_err());
    }

    #[test]
    fn sync_views_takes_an_optional_value() {
        let off = Args::try_parse_from(["stackview", "--sync-views", "false"]).unwrap();
        assert_eq!(off.sync_views, Some(false));
        let unset = Args::try_parse_from(["stackview"]).unwrap();
        assert_eq!(unset.sync_views, None);
    }
}
