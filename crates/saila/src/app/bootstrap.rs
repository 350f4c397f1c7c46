use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine::{load_bitmap, Bitmap, Engine, LoopConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{ConfigError, GameConfig, CONFIG_ENV_VAR};
use super::gameplay::{self, GameNode, SceneHandles, SceneImages};

const DEFAULT_HEADLESS_FRAMES: u32 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchOptions {
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) headless: bool,
    pub(crate) frames: u32,
    pub(crate) seed: Option<u64>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            headless: false,
            frames: DEFAULT_HEADLESS_FRAMES,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    Run(LaunchOptions),
    Help,
}

pub(crate) struct AppWiring {
    pub(crate) loop_config: LoopConfig,
    pub(crate) engine: Engine<GameNode>,
    pub(crate) handles: SceneHandles,
    pub(crate) field_size: (u32, u32),
    /// `Some(frames)` runs without a window for that many fixed steps.
    pub(crate) headless_frames: Option<u32>,
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut options = LaunchOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--config" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --config".to_string())?;
                options.config_path = Some(PathBuf::from(value));
                index += 2;
            }
            "--frames" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --frames".to_string())?;
                options.frames = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid --frames value '{value}' (expected u32)"))?;
                index += 2;
            }
            "--seed" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --seed".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("invalid --seed value '{value}' (expected u64)"))?,
                );
                index += 2;
            }
            "--headless" => {
                options.headless = true;
                index += 1;
            }
            other => return Err(format!("unknown argument '{other}'\n\n{}", usage_text())),
        }
    }
    Ok(CliCommand::Run(options))
}

pub(crate) fn usage_text() -> String {
    [
        "saila - side-scrolling gap runner",
        "",
        "Usage:",
        "  saila [--config <file>] [--seed <u64>]",
        "  saila [--config <file>] [--seed <u64>] --headless [--frames <u32>]",
        "",
        "Options:",
        "  --config <file>   JSON game config (falls back to $SAILA_CONFIG)",
        "  --seed <u64>      seed for gap placement",
        "  --headless        run without a window, driven by the autopilot",
        "  --frames <u32>    frames to simulate in headless mode (default 600)",
    ]
    .join("\n")
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn build_app(options: LaunchOptions) -> Result<AppWiring, ConfigError> {
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let config_path = options
        .config_path
        .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
    let mut config = GameConfig::load(config_path.as_deref())?;
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    info!(
        config_path = ?config_path,
        seed = ?config.seed,
        target_fps = config.target_fps,
        "config_loaded"
    );

    let images = SceneImages {
        player: config
            .player_image
            .as_deref()
            .and_then(|path| load_image(path, "player")),
        pipe: config
            .pipe_image
            .as_deref()
            .and_then(|path| load_image(path, "pipe")),
    };
    let (engine, handles) = gameplay::build_scene(&config, images);

    let field_size = (config.field_width as u32, config.field_height as u32);
    let loop_config = LoopConfig {
        window_width: field_size.0,
        window_height: field_size.1,
        target_fps: Some(config.target_fps),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        loop_config,
        engine,
        handles,
        field_size,
        headless_frames: options.headless.then_some(options.frames),
    })
}

/// Missing or unreadable images fall back to flat color.
fn load_image(path: &Path, role: &'static str) -> Option<Arc<Bitmap>> {
    match load_bitmap(path) {
        Ok(bitmap) => {
            info!(
                role,
                path = %path.display(),
                width = bitmap.width(),
                height = bitmap.height(),
                "image_loaded"
            );
            Some(Arc::new(bitmap))
        }
        Err(err) => {
            warn!(role, path = %path.display(), error = %err, "image_load_failed");
            None
        }
    }
}
