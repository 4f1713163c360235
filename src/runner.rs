//! Application runner - entry point for the CLI, the embedding API and the
//! Python bindings.
//!
//! Arrays are always validated by building a [`Session`] before any window
//! or process is started, so bad input fails fast in the caller.

use std::path::PathBuf;
use std::process::{Child, Command};

use log::{info, trace, warn};
use ndarray::{Array3, ArrayD};

use crate::app::ViewerApp;
use crate::config::{self, PathConfig};
use crate::entities::session::Session;
use crate::error::{Result, ViewerError};
use crate::payload;

/// Environment override for the viewer executable used in subprocess mode.
pub const VIEWER_BIN_ENV: &str = "STACKVIEW_BIN";

pub const DEFAULT_WINDOW_TITLE: &str = "3D Array Viewer";

/// How [`launch_viewer`] shows the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    /// Run the window on this thread until it is closed.
    InProcess,
    /// Hand the arrays to a separate viewer process and return at once.
    #[default]
    Subprocess,
}

/// Outcome of [`launch_viewer`].
#[derive(Debug)]
pub enum Launched {
    /// The in-process window was closed.
    Finished,
    /// The viewer runs in this child process.
    Spawned(Child),
}

/// Start-up options for a viewer window.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub start_frame: usize,
    pub autoplay: bool,
    /// Overrides the persisted fps when set.
    pub fps: Option<u32>,
    /// Overrides the persisted view-sync flag when set.
    pub sync_views: Option<bool>,
    pub title: String,
    pub window_size: [f32; 2],
    pub paths: PathConfig,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            start_frame: 0,
            autoplay: false,
            fps: None,
            sync_views: None,
            title: DEFAULT_WINDOW_TITLE.to_string(),
            window_size: [1200.0, 800.0],
            paths: PathConfig::default(),
        }
    }
}

impl ViewerOptions {
    /// Flags reproducing these options on the viewer command line.
    fn cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.start_frame > 0 {
            args.push("--frame".to_string());
            args.push(self.start_frame.to_string());
        }
        if let Some(fps) = self.fps {
            args.push("--fps".to_string());
            args.push(fps.to_string());
        }
        if self.autoplay {
            args.push("--autoplay".to_string());
        }
        if let Some(sync) = self.sync_views {
            args.push("--sync-views".to_string());
            args.push(sync.to_string());
        }
        if let Some(dir) = &self.paths.config_dir {
            args.push("--config-dir".to_string());
            args.push(dir.display().to_string());
        }
        args
    }
}

/// Show `arrays` in a viewer with default options.
///
/// All arrays must be 3-D `(time, y, x)` with the same shape, one title per
/// array. Validation happens before anything opens.
pub fn launch_viewer(arrays: Vec<ArrayD<f32>>, titles: Vec<String>, mode: LaunchMode) -> Result<Launched> {
    launch_viewer_with(arrays, titles, mode, ViewerOptions::default())
}

/// [`launch_viewer`] with explicit start-up options.
pub fn launch_viewer_with(
    arrays: Vec<ArrayD<f32>>,
    titles: Vec<String>,
    mode: LaunchMode,
    options: ViewerOptions,
) -> Result<Launched> {
    match mode {
        LaunchMode::InProcess => {
            let session = Session::with_arrays(arrays, titles)?;
            run_viewer(session, options)?;
            Ok(Launched::Finished)
        }
        LaunchMode::Subprocess => {
            // Validate here so errors surface in the caller, not the child.
            let shape = Session::check_arrays(&arrays, &titles)?;
            trace!("Validated {} array(s) of shape {} for subprocess launch", arrays.len(), shape);
            spawn_viewer(&arrays, &titles, &options).map(Launched::Spawned)
        }
    }
}

/// Write a payload and start the viewer binary on it.
fn spawn_viewer(arrays: &[ArrayD<f32>], titles: &[String], options: &ViewerOptions) -> Result<Child> {
    let path = payload::write_payload(arrays, titles, None)?;
    let binary = viewer_binary();
    info!("Spawning {} with payload {}", binary.display(), path.display());

    let spawned = Command::new(&binary)
        .arg("--payload")
        .arg(&path)
        .args(options.cli_args())
        .spawn();

    match spawned {
        Ok(child) => Ok(child),
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(&path) {
                warn!("Could not delete payload {}: {}", path.display(), rm);
            }
            Err(ViewerError::Io(e))
        }
    }
}

/// Viewer executable: `STACKVIEW_BIN`, else `stackview` next to the current
/// executable, else `stackview` on `PATH`.
pub fn viewer_binary() -> PathBuf {
    if let Some(bin) = std::env::var_os(VIEWER_BIN_ENV) {
        return PathBuf::from(bin);
    }
    let name = format!("stackview{}", std::env::consts::EXE_SUFFIX);
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let sibling = dir.join(&name);
        if sibling.is_file() {
            return sibling;
        }
    }
    PathBuf::from(name)
}

/// Run the viewer window for an already built session. Blocks until the
/// window is closed.
pub fn run_viewer(session: Session, options: ViewerOptions) -> Result<()> {
    if let Err(e) = config::ensure_dirs(&options.paths) {
        warn!("Failed to create application directories: {:#}", e);
    }
    let settings_path = config::config_file(config::SETTINGS_FILE, &options.paths);
    info!("Settings path: {}", settings_path.display());

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(options.title.as_str())
            .with_inner_size(options.window_size)
            .with_resizable(true),
        persist_window: true,
        persistence_path: Some(settings_path),
        ..Default::default()
    };

    info!("Starting viewer with {} dock(s)", session.len());
    let title = options.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(session, &options, cc.storage)))),
    )
    .map_err(|e| ViewerError::Gui(e.to_string()))
}

/// Two deterministic demo stacks ("Random A", "Random B"), 100×64×128.
pub fn demo_arrays() -> (Vec<ArrayD<f32>>, Vec<String>) {
    const SHAPE: (usize, usize, usize) = (100, 64, 128);
    let a = Array3::from_shape_fn(SHAPE, |(t, y, x)| {
        let phase = t as f32 * 0.1;
        (x as f32 * 0.15 + phase).sin() * (y as f32 * 0.2).cos()
    });
    let b = Array3::from_shape_fn(SHAPE, |(t, y, x)| {
        let phase = t as f32 * 0.07;
        (x as f32 * 0.05 - phase).cos() + (y as f32 * 0.1 + phase).sin() * 0.5
    });
    (
        vec![a.into_dyn(), b.into_dyn()],
        vec!["Random A".to_string(), "Random B".to_string()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn demo_arrays_share_shape() {
        let (arrays, titles) = demo_arrays();
        assert_eq!(titles, vec!["Random A", "Random B"]);
        assert!(arrays.iter().all(|a| a.shape() == [100, 64, 128]));
        let session = Session::with_arrays(arrays, titles).unwrap();
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn invalid_input_fails_before_launch() {
        let a = ArrayD::<f32>::zeros(IxDyn(&[2, 3, 4]));
        let b = ArrayD::<f32>::zeros(IxDyn(&[2, 3, 5]));
        let err = launch_viewer(vec![a.clone(), b], vec!["a".into(), "b".into()], LaunchMode::Subprocess)
            .unwrap_err();
        assert!(matches!(err, ViewerError::ShapeMismatch { .. }));

        let err = launch_viewer(vec![a], vec![], LaunchMode::InProcess).unwrap_err();
        assert!(matches!(err, ViewerError::TitleCountMismatch { .. }));

        let flat = ArrayD::<f32>::zeros(IxDyn(&[3, 4]));
        let err = launch_viewer(vec![flat], vec!["flat".into()], LaunchMode::Subprocess).unwrap_err();
        assert!(matches!(err, ViewerError::NotThreeDimensional { .. }));
    }

    #[test]
    fn options_become_cli_flags() {
        let options = ViewerOptions {
            start_frame: 4,
            autoplay: true,
            fps: Some(25),
            sync_views: Some(true),
            ..Default::default()
        };
        assert_eq!(
            options.cli_args(),
            vec!["--frame", "4", "--fps", "25", "--autoplay", "--sync-views", "true"]
        );
        let off = ViewerOptions {
            sync_views: Some(false),
            ..Default::default()
        };
        assert_eq!(off.cli_args(), vec!["--sync-views", "false"]);
        assert!(ViewerOptions::default().cli_args().is_empty());
    }
}
