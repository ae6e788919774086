//! Replay command - feed recorded samples through the engine.
//!
//! Input is one sample per line, `azimuth[,pitch,roll]` in degrees. Blank
//! lines and lines starting with `#` are skipped. Every accepted heading is
//! printed with the rotation the dial would be drawn at.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use compass::device::manual::{FlagWakeLock, ManualPositionService, ManualSensorService};
use compass::engine::{CompassEngine, EngineEvent};
use compass::lifecycle::LifecycleServices;
use compass::location::NoGeocoder;
use compass::orientation::RawOrientationSample;
use compass::renderer::{CountingRedrawSink, SurfaceBounds};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub file: PathBuf,
    /// Print dropped samples too.
    pub verbose: bool,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(false)?;
    runner.log_startup("replay");
    let config = runner.config();

    let input = fs::read_to_string(&args.file)?;
    let samples = parse_samples(&input)?;

    let sensors = Arc::new(ManualSensorService::new());
    let services = LifecycleServices {
        sensors: sensors.clone(),
        positions: Arc::new(ManualPositionService::new(config.location.provider.clone())),
        wake_lock: Arc::new(FlagWakeLock::new()),
    };
    let sink = Arc::new(CountingRedrawSink::new());
    let mut engine = CompassEngine::new(
        services,
        Arc::new(NoGeocoder),
        sink.clone(),
        config.coordinator_config(),
    );

    engine.handle_event(EngineEvent::Foreground);
    info!(file = %args.file.display(), samples = samples.len(), "Replaying samples");

    let bounds = SurfaceBounds::new(200.0, 200.0);
    for (line, sample) in &samples {
        let before = sink.count();
        sensors.emit(*sample);
        engine.drain();

        if sink.count() > before {
            let transform = engine.renderer().compute_transform(bounds);
            println!(
                "{:>5}: heading {:>7.2}°  rotation {:>7.2}°",
                line,
                sample.azimuth,
                transform.normalized_degrees()
            );
        } else if args.verbose {
            println!("{:>5}: {:>7.2}° dropped", line, sample.azimuth);
        }
    }

    engine.handle_event(EngineEvent::Background);

    let filter = engine.filter();
    println!();
    println!(
        "{} samples: {} accepted, {} dropped, {} redraws",
        samples.len(),
        filter.accepted_count(),
        filter.dropped_count(),
        sink.count()
    );
    Ok(())
}

/// Parse the whole input, keeping 1-based line numbers.
fn parse_samples(input: &str) -> Result<Vec<(usize, RawOrientationSample)>, CliError> {
    input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            parse_sample(line)
                .map(|sample| (number, sample))
                .map_err(|message| CliError::Replay {
                    line: number,
                    message,
                })
        })
        .collect()
}

/// Parse `azimuth[,pitch,roll]`.
fn parse_sample(line: &str) -> Result<RawOrientationSample, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let angle = |name: &str, value: &str| {
        value
            .parse::<f32>()
            .map_err(|_| format!("invalid {} '{}'", name, value))
    };

    match fields[..] {
        [azimuth] => Ok(RawOrientationSample::from_azimuth(angle("azimuth", azimuth)?)),
        [azimuth, pitch, roll] => Ok(RawOrientationSample::new(
            angle("azimuth", azimuth)?,
            angle("pitch", pitch)?,
            angle("roll", roll)?,
        )),
        _ => Err(format!(
            "expected 'azimuth' or 'azimuth,pitch,roll', got {} fields",
            fields.len()
        )),
    }
}
