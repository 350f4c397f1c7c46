use std::process::ExitCode;

use engine::run_app;
use tracing::error;

use super::bootstrap::AppWiring;
use super::headless::run_headless;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        loop_config,
        mut engine,
        handles,
        field_size,
        headless_frames,
    } = app;

    if let Some(frames) = headless_frames {
        let fps = loop_config.target_fps.unwrap_or(60);
        run_headless(&mut engine, &handles, frames, fps, field_size);
        return ExitCode::SUCCESS;
    }

    if let Err(err) = run_app(loop_config, engine) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
