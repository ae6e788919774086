//! Run command - live compass over simulated devices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use compass::engine::CompassEngine;
use compass::lifecycle::LifecycleServices;
use tracing::{info, warn};

use crate::device::{SimulatedPositionService, SimulatedSensorService, SimulatedWakeLock};
use crate::error::CliError;
use crate::runner::CliRunner;
use crate::tui_app::{self, print_session_summary};
use crate::ui::FrameRequests;

/// Arguments for the run command.
pub struct RunArgs {
    /// Simulated rotation in degrees per second.
    pub sweep_rate: f32,
    /// Simulate a device with positioning switched off.
    pub no_position: bool,
    /// Simulate a device without an orientation sensor.
    pub no_sensor: bool,
    /// Print heading changes instead of drawing the dashboard.
    pub headless: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let interactive = !args.headless && atty::is(atty::Stream::Stdout);
    let runner = CliRunner::new(!interactive)?;
    runner.log_startup("run");
    let config = runner.config();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("compass-device")
        .enable_time()
        .build()?;

    let services = LifecycleServices {
        sensors: Arc::new(
            SimulatedSensorService::new(runtime.handle().clone(), args.sweep_rate)
                .with_available(!args.no_sensor),
        ),
        positions: Arc::new(
            SimulatedPositionService::new(
                runtime.handle().clone(),
                config.location.provider.clone(),
            )
            .with_enabled(!args.no_position),
        ),
        wake_lock: Arc::new(SimulatedWakeLock::new()),
    };

    let frames = Arc::new(FrameRequests::new());
    let engine = CompassEngine::new(
        services,
        runner.geocoder(),
        frames.clone(),
        config.coordinator_config(),
    );
    let handle = engine.handle();
    let engine_thread = engine
        .spawn()
        .map_err(|e| CliError::Engine(format!("Failed to start engine thread: {}", e)))?;

    // The compass starts in front of the user
    handle.foreground();

    let result = if interactive {
        tui_app::run_tui(&handle, &frames)
    } else {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
        tui_app::run_headless(&handle, &frames, shutdown)
    };

    handle.shutdown();
    let engine = engine_thread
        .join()
        .map_err(|_| CliError::Engine("engine thread panicked".to_string()))?;
    runtime.shutdown_timeout(Duration::from_secs(1));

    info!(redraws = frames.total(), "compass stopped");
    print_session_summary(&engine.snapshot());
    result
}
