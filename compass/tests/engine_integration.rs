//! Integration tests for the compass engine.
//!
//! These drive the full flow through the public API:
//! - sensor callback → event queue → noise gate → renderer redraw
//! - foreground/background cycles acquiring and releasing device resources
//! - late deliveries from released subscriptions
//! - degraded devices and failing reverse geocoding
//!
//! Run with: `cargo test --test engine_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use compass::device::manual::{FlagWakeLock, ManualPositionService, ManualSensorService};
use compass::device::{PositionEvent, SensorRate, WakeLock};
use compass::display::{
    LAST_KNOWN_LABEL, NO_SENSOR_DATA, POSITIONING_UNAVAILABLE, SENSOR_UNAVAILABLE,
};
use compass::engine::{CompassEngine, EngineEvent};
use compass::lifecycle::{CoordinatorConfig, LifecycleServices, LifecycleState};
use compass::location::{
    Address, GeocodeError, GnssStatus, HttpClient, LocationFix, NoGeocoder, NominatimGeocoder,
    ReverseGeocoder,
};
use compass::orientation::RawOrientationSample;
use compass::renderer::{CountingRedrawSink, SurfaceBounds};

// ============================================================================
// Helper Functions
// ============================================================================

struct Rig {
    sensors: Arc<ManualSensorService>,
    positions: Arc<ManualPositionService>,
    wake_lock: Arc<FlagWakeLock>,
    sink: Arc<CountingRedrawSink>,
    engine: CompassEngine,
}

impl Rig {
    fn new() -> Self {
        Self::build(
            ManualSensorService::new(),
            ManualPositionService::new("gps"),
            FlagWakeLock::new(),
            Arc::new(NoGeocoder),
        )
    }

    fn build(
        sensors: ManualSensorService,
        positions: ManualPositionService,
        wake_lock: FlagWakeLock,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        let sensors = Arc::new(sensors);
        let positions = Arc::new(positions);
        let wake_lock = Arc::new(wake_lock);
        let sink = Arc::new(CountingRedrawSink::new());

        let services = LifecycleServices {
            sensors: sensors.clone(),
            positions: positions.clone(),
            wake_lock: wake_lock.clone(),
        };
        let engine = CompassEngine::new(
            services,
            geocoder,
            sink.clone(),
            CoordinatorConfig::default(),
        );

        Self {
            sensors,
            positions,
            wake_lock,
            sink,
            engine,
        }
    }

    fn foreground(&mut self) {
        assert!(self.engine.handle_event(EngineEvent::Foreground));
    }

    fn background(&mut self) {
        assert!(self.engine.handle_event(EngineEvent::Background));
    }

    /// Deliver one sample through the sensor and process it.
    fn sample(&mut self, azimuth: f32) {
        self.sensors.emit(RawOrientationSample::from_azimuth(azimuth));
        self.engine.drain();
    }

    fn rotation(&self) -> f32 {
        self.engine
            .renderer()
            .compute_transform(SurfaceBounds::new(200.0, 200.0))
            .rotation_degrees
    }

    fn holds_nothing(&self) -> bool {
        self.sensors.active_subscriptions() == 0
            && self.positions.active_subscriptions() == 0
            && !self.wake_lock.is_held()
    }
}

/// Geocoder that always fails and counts attempts.
#[derive(Default)]
struct FailingGeocoder {
    calls: AtomicUsize,
}

impl ReverseGeocoder for FailingGeocoder {
    fn lookup(&self, _lat: f64, _lon: f64) -> Result<Vec<Address>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GeocodeError::Lookup("service unreachable".to_string()))
    }
}

/// HTTP client returning a canned Nominatim body.
struct CannedHttp(&'static str);

impl HttpClient for CannedHttp {
    fn get(&self, _url: &str) -> Result<Vec<u8>, GeocodeError> {
        Ok(self.0.as_bytes().to_vec())
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_samples_drive_redraws_end_to_end() {
    let mut rig = Rig::new();
    rig.foreground();

    rig.sample(10.0);
    assert_eq!(rig.sink.count(), 1);
    assert_eq!(rig.rotation(), 350.0);

    rig.sample(11.0);
    assert_eq!(rig.sink.count(), 1);

    rig.sample(25.0);
    assert_eq!(rig.sink.count(), 2);
    assert_eq!(rig.rotation(), 335.0);

    rig.sample(26.0);
    assert_eq!(rig.sink.count(), 2);
    assert_eq!(rig.rotation(), 335.0);
}

#[test]
fn test_first_sample_near_zero_is_accepted() {
    let mut rig = Rig::new();
    rig.foreground();

    rig.sample(1.0);

    assert_eq!(rig.sink.count(), 1);
    assert_eq!(rig.rotation(), 359.0);
}

#[test]
fn test_crossing_north_redraws() {
    let mut rig = Rig::new();
    rig.foreground();

    rig.sample(359.0);
    rig.sample(1.0);

    assert_eq!(rig.sink.count(), 2);
    assert_eq!(rig.rotation(), 359.0);
}

#[test]
fn test_repeated_cycles_release_everything() {
    let mut rig = Rig::new();

    for cycle in 0..10 {
        rig.foreground();
        assert_eq!(rig.sensors.active_subscriptions(), 1);
        assert_eq!(rig.positions.active_subscriptions(), 1);
        assert!(rig.wake_lock.is_held());

        rig.sample((cycle * 30) as f32);

        rig.background();
        assert!(rig.holds_nothing(), "cycle {} leaked a resource", cycle);
    }

    assert_eq!(rig.wake_lock.acquisitions(), 10);
    assert_eq!(rig.wake_lock.releases(), 10);
}

#[test]
fn test_samples_while_backgrounded_never_redraw() {
    let mut rig = Rig::new();
    rig.foreground();
    rig.sample(90.0);
    rig.background();

    // No subscriber: nothing is delivered at all
    assert_eq!(
        rig.sensors.emit(RawOrientationSample::from_azimuth(270.0)),
        0
    );

    // A delivery racing the unsubscribe still reaches the old callback
    for callback in rig.sensors.registered_callbacks() {
        callback(RawOrientationSample::from_azimuth(270.0));
    }
    rig.engine.drain();

    assert_eq!(rig.sink.count(), 1);
    assert_eq!(rig.rotation(), 270.0);
}

#[test]
fn test_late_sample_from_previous_activation_is_dropped() {
    let mut rig = Rig::new();
    rig.foreground();
    rig.background();
    rig.foreground();

    let callbacks = rig.sensors.registered_callbacks();
    assert_eq!(callbacks.len(), 2);

    callbacks[0](RawOrientationSample::from_azimuth(180.0));
    rig.engine.drain();
    assert_eq!(rig.sink.count(), 0);

    callbacks[1](RawOrientationSample::from_azimuth(180.0));
    rig.engine.drain();
    assert_eq!(rig.sink.count(), 1);
}

#[test]
fn test_missing_sensor_still_holds_other_resources() {
    let mut rig = Rig::build(
        ManualSensorService::unavailable(),
        ManualPositionService::new("gps"),
        FlagWakeLock::new(),
        Arc::new(NoGeocoder),
    );
    rig.foreground();

    assert_eq!(rig.engine.lifecycle_state(), LifecycleState::Active);
    assert!(rig.wake_lock.is_held());
    assert_eq!(rig.positions.active_subscriptions(), 1);
    assert_eq!(rig.engine.display().sensor_text(), SENSOR_UNAVAILABLE);

    rig.background();
    assert!(rig.holds_nothing());
}

#[test]
fn test_disabled_positioning_is_shown() {
    let mut rig = Rig::build(
        ManualSensorService::new(),
        ManualPositionService::disabled("gps", "location services off"),
        FlagWakeLock::new(),
        Arc::new(NoGeocoder),
    );
    rig.foreground();

    assert_eq!(rig.engine.display().location_text(), POSITIONING_UNAVAILABLE);
    assert_eq!(rig.engine.display().sensor_text(), NO_SENSOR_DATA);
}

#[test]
fn test_sensor_lost_between_activations_shows_unavailable() {
    let mut rig = Rig::new();
    rig.foreground();
    rig.sample(90.0);
    assert_eq!(
        rig.engine.display().sensor_text(),
        "Azimuth: 90\nPitch: 0\nRoll: 0"
    );
    rig.background();

    rig.sensors.set_available(false);
    rig.foreground();

    let snapshot = rig.engine.snapshot();
    assert_eq!(snapshot.display.sensor_text(), SENSOR_UNAVAILABLE);
    assert_eq!(snapshot.heading, None);
    assert_eq!(rig.sensors.active_subscriptions(), 0);
    assert_eq!(rig.sink.count(), 1);
}

#[test]
fn test_positioning_lost_between_activations_labels_last_fix() {
    let mut rig = Rig::new();
    rig.foreground();
    rig.positions.emit(PositionEvent::Fix(LocationFix::new(
        40.4168,
        -3.7038,
        Utc::now(),
        "gps",
    )));
    rig.engine.drain();
    let live = rig.engine.display().location_text();
    assert!(live.starts_with("Lat: 40.42 Long: -3.70"));
    rig.background();

    rig.positions
        .set_disabled(Some("location services off".to_string()));
    rig.foreground();

    assert_eq!(
        rig.engine.display().location_text(),
        format!("{}\n{}\n{}", POSITIONING_UNAVAILABLE, LAST_KNOWN_LABEL, live)
    );

    // Positioning back on shows the readout without the label
    rig.background();
    rig.positions.set_disabled(None);
    rig.foreground();
    assert_eq!(rig.engine.display().location_text(), live);
}

#[test]
fn test_geocoder_failure_falls_back_to_coordinates() {
    let geocoder = Arc::new(FailingGeocoder::default());
    let mut rig = Rig::build(
        ManualSensorService::new(),
        ManualPositionService::new("gps"),
        FlagWakeLock::new(),
        geocoder.clone(),
    );
    rig.foreground();

    rig.positions.emit(PositionEvent::Fix(
        LocationFix::new(51.5074, -0.1278, Utc::now(), "gps").with_altitude(35.0),
    ));
    rig.engine.drain();

    assert_eq!(
        rig.engine.display().location_text(),
        "Lat: 51.51 Long: -0.13 Alt: 35.00\njust now via gps"
    );
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nominatim_address_in_readout() {
    let body = r#"{
        "display_name": "Rathausmarkt 1, Hamburg",
        "address": {
            "house_number": "1",
            "road": "Rathausmarkt",
            "postcode": "20095",
            "suburb": "Altstadt",
            "city": "Hamburg",
            "state": "Hamburg",
            "country": "Germany"
        }
    }"#;
    let geocoder = NominatimGeocoder::with_client("http://localhost/reverse", CannedHttp(body));
    let mut rig = Rig::build(
        ManualSensorService::new(),
        ManualPositionService::new("gps"),
        FlagWakeLock::new(),
        Arc::new(geocoder),
    );
    rig.foreground();

    rig.positions.emit(PositionEvent::Fix(LocationFix::new(
        53.5503,
        9.9920,
        Utc::now(),
        "gps",
    )));
    rig.engine.drain();

    let text = rig.engine.display().location_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "1 Rathausmarkt");
    assert_eq!(lines[1], "20095 Altstadt");
    assert_eq!(lines[2], "Hamburg, Hamburg");
    assert_eq!(lines[3], "Lat: 53.55 Long: 9.99");
}

#[test]
fn test_gnss_status_updates_satellites_line() {
    let mut rig = Rig::new();
    rig.foreground();

    rig.positions.emit(PositionEvent::Status(GnssStatus {
        time_to_first_fix: Some(Duration::from_millis(3200)),
        satellites_in_view: 12,
        satellites_used: 8,
    }));
    rig.engine.drain();

    assert_eq!(
        rig.engine.display().satellites_text(),
        "Satellites time-to-first-fix: 3200ms (8/12 used)"
    );
}

#[test]
fn test_configured_rate_reaches_sensor() {
    let sensors = Arc::new(ManualSensorService::new());
    let positions = Arc::new(ManualPositionService::new("gps"));
    let services = LifecycleServices {
        sensors: sensors.clone(),
        positions,
        wake_lock: Arc::new(FlagWakeLock::new()),
    };
    let config = CoordinatorConfig {
        sensor_rate: SensorRate::Game,
        ..CoordinatorConfig::default()
    };
    let mut engine = CompassEngine::new(
        services,
        Arc::new(NoGeocoder),
        Arc::new(CountingRedrawSink::new()),
        config,
    );

    engine.handle_event(EngineEvent::Foreground);
    assert_eq!(sensors.active_rates(), vec![SensorRate::Game]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_loop_with_concurrent_sensor_thread() {
    let mut rig = Rig::new();
    let handle = rig.engine.handle();
    let cancel = CancellationToken::new();

    handle.foreground();

    let sensors = rig.sensors.clone();
    let feeder_handle = handle.clone();
    let feeder = std::thread::spawn(move || {
        // Wait for the subscription to exist before emitting
        while sensors.active_subscriptions() == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
        for azimuth in [10.0, 11.0, 25.0, 26.0] {
            sensors.emit(RawOrientationSample::from_azimuth(azimuth));
        }
        feeder_handle.shutdown();
    });

    rig.engine.run(cancel).await;
    feeder.join().unwrap();

    assert_eq!(rig.sink.count(), 2);
    assert!(rig.holds_nothing());
    assert_eq!(handle.snapshot().lifecycle, LifecycleState::Inactive);
}
