//! Interactive and headless front ends for a running engine.
//!
//! # Architecture
//!
//! - `run_tui()` - dashboard with key handling, redrawn on engine requests
//! - `run_headless()` - prints heading changes until Ctrl+C
//!
//! Both only talk to the engine through its [`EngineHandle`]: lifecycle
//! requests go in, snapshots come out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use compass::engine::{EngineHandle, EngineSnapshot};
use compass::renderer::SurfaceBounds;
use tracing::info;

use crate::error::CliError;
use crate::ui::{Dashboard, DashboardEvent, FrameRequests};

/// Key poll interval, which also bounds redraw latency.
const TICK: Duration = Duration::from_millis(50);

/// Redraw at least this often so relative fix times stay current.
const REFRESH: Duration = Duration::from_secs(1);

/// Run the dashboard until the user quits.
pub fn run_tui(engine: &EngineHandle, frames: &FrameRequests) -> Result<(), CliError> {
    let mut dashboard =
        Dashboard::new().map_err(|e| CliError::Tui(format!("Failed to start dashboard: {}", e)))?;
    let mut snapshots = engine.watch();
    let mut last_draw: Option<Instant> = None;

    loop {
        let redraw = frames.take()
            || snapshots.has_changed().unwrap_or(false)
            || last_draw.map_or(true, |at| at.elapsed() >= REFRESH);
        if redraw {
            let snapshot = snapshots.borrow_and_update().clone();
            dashboard
                .draw(&snapshot)
                .map_err(|e| CliError::Tui(format!("Dashboard draw error: {}", e)))?;
            last_draw = Some(Instant::now());
        }

        let event = dashboard
            .poll_event(TICK)
            .map_err(|e| CliError::Tui(format!("Input error: {}", e)))?;
        match event {
            Some(DashboardEvent::Foreground) => {
                info!("Foreground requested");
                engine.foreground();
            }
            Some(DashboardEvent::Background) => {
                info!("Background requested");
                engine.background();
            }
            Some(DashboardEvent::Quit) => break,
            None => {}
        }
    }

    Ok(())
}

/// Print heading changes until `shutdown` is set.
pub fn run_headless(
    engine: &EngineHandle,
    frames: &FrameRequests,
    shutdown: Arc<AtomicBool>,
) -> Result<(), CliError> {
    println!("Compass running headless.");
    println!("Press Ctrl+C to stop.");
    println!();

    let mut last_location = String::new();
    let mut last_satellites = String::new();

    while !shutdown.load(Ordering::SeqCst) {
        std::thread::sleep(TICK);

        if frames.take() {
            print_heading(&engine.snapshot());
        }

        let snapshot = engine.snapshot();
        let location = snapshot.display.location_text();
        if location != last_location {
            println!("{}", location.replace('\n', " | "));
            last_location = location;
        }
        let satellites = snapshot.display.satellites_text();
        if !satellites.is_empty() && satellites != last_satellites {
            println!("{}", satellites);
            last_satellites = satellites;
        }
    }

    Ok(())
}

fn print_heading(snapshot: &EngineSnapshot) {
    if let Some(heading) = snapshot.heading {
        let transform = snapshot.transform(SurfaceBounds::new(200.0, 200.0));
        println!(
            "Heading {:>6}  rotation {:>6.1}°  ({} accepted, {} dropped)",
            heading.to_string(),
            transform.normalized_degrees(),
            snapshot.accepted,
            snapshot.dropped
        );
    }
}

/// Final counters after the engine stopped.
pub fn print_session_summary(snapshot: &EngineSnapshot) {
    println!();
    println!("Session Summary");
    println!("───────────────");
    println!(
        "  Samples: {} accepted, {} dropped",
        snapshot.accepted, snapshot.dropped
    );
    println!("  Redraws requested: {}", snapshot.redraw_requests);
    println!("  Activations: {}", snapshot.generation.value());
    match snapshot.heading {
        Some(heading) => println!("  Last heading: {}", heading),
        None => println!("  Last heading: none"),
    }
}
