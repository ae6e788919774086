//! Simulated sensors driven by tokio tasks.
//!
//! Each subscription spawns one task on the runtime handle the service was
//! built with. Unsubscribing cancels that task's token, so no callback runs
//! after `unsubscribe` returns except one already in flight.
//!
//! ```text
//! subscribe() ──► runtime.spawn(loop { tick → callback(sample) })
//!                        ▲
//! unsubscribe() ─────────┘ token.cancel()
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use compass::device::{
    DeviceError, OrientationCallback, PositionCallback, PositionEvent, PositionRequest,
    PositionService, PositionSubscription, SensorKind, SensorRate, SensorService,
    SensorSubscription, WakeLock,
};
use compass::location::{GnssStatus, LocationFix};
use compass::orientation::RawOrientationSample;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default needle sweep in degrees per second.
pub const DEFAULT_SWEEP_RATE: f32 = 6.0;

/// Shortest interval used for `SensorRate::Fastest`.
const FASTEST_INTERVAL: Duration = Duration::from_millis(5);

/// Simulated time until the first satellite fix.
const TIME_TO_FIRST_FIX: Duration = Duration::from_millis(1_800);

/// Where simulated fixes start (Hamburg Rathausmarkt).
const START_POSITION: (f64, f64) = (53.5503, 9.9920);

/// Live subscription tasks keyed by handle id.
#[derive(Default)]
struct TaskRegistry {
    next_id: AtomicU64,
    tokens: Mutex<HashMap<u64, CancellationToken>>,
}

impl TaskRegistry {
    fn register(&self) -> (u64, CancellationToken) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();
        self.tokens.lock().insert(id, token.clone());
        (id, token)
    }

    fn cancel(&self, id: u64) -> Result<(), DeviceError> {
        let token = self
            .tokens
            .lock()
            .remove(&id)
            .ok_or(DeviceError::UnknownSubscription(id))?;
        token.cancel();
        Ok(())
    }

    fn cancel_all(&self) {
        for (_, token) in self.tokens.lock().drain() {
            token.cancel();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orientation sensor
// ─────────────────────────────────────────────────────────────────────────────

/// Orientation sensor sweeping the heading at a constant rate with jitter.
pub struct SimulatedSensorService {
    runtime: Handle,
    sweep_rate: f32,
    available: bool,
    tasks: TaskRegistry,
}

impl SimulatedSensorService {
    /// A sensor turning `sweep_rate` degrees per second clockwise.
    pub fn new(runtime: Handle, sweep_rate: f32) -> Self {
        Self {
            runtime,
            sweep_rate,
            available: true,
            tasks: TaskRegistry::default(),
        }
    }

    /// Simulate a device without an orientation sensor.
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

impl SensorService for SimulatedSensorService {
    fn subscribe(
        &self,
        kind: SensorKind,
        rate: SensorRate,
        callback: OrientationCallback,
    ) -> Result<SensorSubscription, DeviceError> {
        if !self.available {
            return Err(DeviceError::SensorUnavailable(kind));
        }

        let (id, token) = self.tasks.register();
        let period = rate.nominal_interval().max(FASTEST_INTERVAL);
        let sweep_rate = self.sweep_rate;
        debug!(id, %rate, period_ms = period.as_millis() as u64, "Simulated sensor started");

        self.runtime.spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let mut azimuth: f32 = rng.random_range(0.0..360.0);
            let step = sweep_rate * period.as_secs_f32();
            let mut ticker = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        azimuth = (azimuth + step).rem_euclid(360.0);
                        let jitter: f32 = rng.random_range(-1.5..1.5);
                        let sample = RawOrientationSample::new(
                            (azimuth + jitter).rem_euclid(360.0),
                            rng.random_range(-4.0..4.0),
                            rng.random_range(-3.0..3.0),
                        );
                        callback(sample);
                    }
                }
            }
            debug!(id, "Simulated sensor stopped");
        });

        Ok(SensorSubscription::new(id))
    }

    fn unsubscribe(&self, handle: SensorSubscription) -> Result<(), DeviceError> {
        self.tasks.cancel(handle.id())
    }
}

impl Drop for SimulatedSensorService {
    fn drop(&mut self) {
        self.tasks.cancel_all();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Positioning
// ─────────────────────────────────────────────────────────────────────────────

/// Positioning that acquires satellites, then wanders slowly.
///
/// Fixes are spaced by the request's minimum interval. The simulated walk
/// always exceeds the minimum distance between fixes.
pub struct SimulatedPositionService {
    runtime: Handle,
    provider: String,
    enabled: bool,
    tasks: TaskRegistry,
    last_known: Arc<Mutex<Option<LocationFix>>>,
}

impl SimulatedPositionService {
    pub fn new(runtime: Handle, provider: impl Into<String>) -> Self {
        Self {
            runtime,
            provider: provider.into(),
            enabled: true,
            tasks: TaskRegistry::default(),
            last_known: Arc::new(Mutex::new(None)),
        }
    }

    /// Simulate positioning switched off by the user.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl PositionService for SimulatedPositionService {
    fn subscribe(
        &self,
        request: PositionRequest,
        callback: PositionCallback,
    ) -> Result<PositionSubscription, DeviceError> {
        if !self.enabled {
            return Err(DeviceError::PositioningDisabled(
                "positioning disabled with --no-position".to_string(),
            ));
        }

        let (id, token) = self.tasks.register();
        let provider = self.provider.clone();
        let last_known = self.last_known.clone();
        let interval = request.min_interval.max(Duration::from_secs(1));
        // Degrees of latitude per step, comfortably above the distance filter
        let step = f64::from(request.min_distance_m.max(1.0)) * 2.0 / 111_000.0;

        self.runtime.spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let in_view = rng.random_range(8..14);

            callback(PositionEvent::Status(GnssStatus {
                time_to_first_fix: None,
                satellites_in_view: in_view,
                satellites_used: 0,
            }));

            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(TIME_TO_FIRST_FIX) => {}
            }

            callback(PositionEvent::Status(GnssStatus {
                time_to_first_fix: Some(TIME_TO_FIRST_FIX),
                satellites_in_view: in_view,
                satellites_used: rng.random_range(4..=in_view),
            }));

            let (mut lat, mut lon) = last_known
                .lock()
                .as_ref()
                .map(|fix| (fix.latitude, fix.longitude))
                .unwrap_or(START_POSITION);
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let bearing: f64 = rng.random_range(0.0..std::f64::consts::TAU);
                        lat += step * bearing.cos();
                        lon += step * bearing.sin() / lat.to_radians().cos();
                        let fix = LocationFix::new(lat, lon, Utc::now(), provider.clone())
                            .with_altitude(rng.random_range(5.0..40.0));
                        *last_known.lock() = Some(fix.clone());
                        callback(PositionEvent::Fix(fix));
                    }
                }
            }
            debug!(id, "Simulated positioning stopped");
        });

        Ok(PositionSubscription::new(id))
    }

    fn unsubscribe(&self, handle: PositionSubscription) -> Result<(), DeviceError> {
        self.tasks.cancel(handle.id())
    }

    fn last_known(&self) -> Option<LocationFix> {
        self.last_known.lock().clone()
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }
}

impl Drop for SimulatedPositionService {
    fn drop(&mut self) {
        self.tasks.cancel_all();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wake lock
// ─────────────────────────────────────────────────────────────────────────────

/// Wake lock that only records whether it is held.
#[derive(Debug, Default)]
pub struct SimulatedWakeLock {
    held: AtomicBool,
}

impl SimulatedWakeLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WakeLock for SimulatedWakeLock {
    fn acquire(&self) -> Result<(), DeviceError> {
        self.held.store(true, Ordering::SeqCst);
        debug!("Screen kept awake");
        Ok(())
    }

    fn release(&self) -> Result<(), DeviceError> {
        self.held.store(false, Ordering::SeqCst);
        debug!("Screen may sleep");
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}
