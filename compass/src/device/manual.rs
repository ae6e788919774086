//! In-process device services that deliver data on demand.
//!
//! These implement the device traits without any hardware: a sensor
//! "sample" is whatever the host passes to [`ManualSensorService::emit`].
//! The replay command feeds recorded samples through them, and tests use
//! them to observe exactly which subscriptions the lifecycle holds.
//!
//! Callbacks are cloned out of the registry before they run, so a callback
//! may safely call back into the service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use super::types::{
    DeviceError, OrientationCallback, PositionCallback, PositionEvent, PositionRequest,
    PositionService, PositionSubscription, SensorKind, SensorRate, SensorService,
    SensorSubscription, WakeLock,
};
use crate::location::LocationFix;
use crate::orientation::RawOrientationSample;

// ─────────────────────────────────────────────────────────────────────────────
// Sensor
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SensorRegistry {
    active: HashMap<u64, (SensorRate, OrientationCallback)>,
    /// Every callback ever registered, released ones included.
    history: Vec<OrientationCallback>,
}

/// Orientation sensor that delivers samples only when [`emit`](Self::emit) is called.
pub struct ManualSensorService {
    available: AtomicBool,
    next_id: AtomicU64,
    registry: Mutex<SensorRegistry>,
}

impl Default for ManualSensorService {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualSensorService {
    /// A device with an orientation sensor.
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            registry: Mutex::new(SensorRegistry::default()),
        }
    }

    /// A device without an orientation sensor; every subscribe fails.
    pub fn unavailable() -> Self {
        Self {
            available: AtomicBool::new(false),
            ..Self::new()
        }
    }

    /// Make later subscribes succeed or fail. Held subscriptions are kept.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Deliver `sample` to every active subscriber. Returns how many received it.
    pub fn emit(&self, sample: RawOrientationSample) -> usize {
        let callbacks: Vec<OrientationCallback> = self
            .registry
            .lock()
            .active
            .values()
            .map(|(_, cb)| cb.clone())
            .collect();

        for callback in &callbacks {
            callback(sample);
        }
        callbacks.len()
    }

    /// Number of subscriptions currently held.
    pub fn active_subscriptions(&self) -> usize {
        self.registry.lock().active.len()
    }

    /// Rates of the currently held subscriptions.
    pub fn active_rates(&self) -> Vec<SensorRate> {
        self.registry
            .lock()
            .active
            .values()
            .map(|(rate, _)| *rate)
            .collect()
    }

    /// All callbacks ever registered, including released ones.
    ///
    /// Invoking a released callback simulates a platform delivery racing an
    /// unsubscribe.
    pub fn registered_callbacks(&self) -> Vec<OrientationCallback> {
        self.registry.lock().history.clone()
    }
}

impl SensorService for ManualSensorService {
    fn subscribe(
        &self,
        kind: SensorKind,
        rate: SensorRate,
        callback: OrientationCallback,
    ) -> Result<SensorSubscription, DeviceError> {
        if !self.available.load(Ordering::Acquire) {
            return Err(DeviceError::SensorUnavailable(kind));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut registry = self.registry.lock();
        registry.history.push(callback.clone());
        registry.active.insert(id, (rate, callback));
        Ok(SensorSubscription::new(id))
    }

    fn unsubscribe(&self, handle: SensorSubscription) -> Result<(), DeviceError> {
        self.registry
            .lock()
            .active
            .remove(&handle.id())
            .map(|_| ())
            .ok_or(DeviceError::UnknownSubscription(handle.id()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Position
// ─────────────────────────────────────────────────────────────────────────────

/// Positioning service that delivers events only when told to.
pub struct ManualPositionService {
    provider: String,
    disabled_reason: Mutex<Option<String>>,
    next_id: AtomicU64,
    active: Mutex<HashMap<u64, (PositionRequest, PositionCallback)>>,
    last_known: Mutex<Option<LocationFix>>,
}

impl ManualPositionService {
    /// An enabled service reporting fixes from `provider`.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            disabled_reason: Mutex::new(None),
            next_id: AtomicU64::new(1),
            active: Mutex::new(HashMap::new()),
            last_known: Mutex::new(None),
        }
    }

    /// A service with positioning switched off.
    pub fn disabled(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            disabled_reason: Mutex::new(Some(reason.into())),
            ..Self::new(provider)
        }
    }

    /// Switch positioning off (`Some(reason)`) or back on for later
    /// subscribes.
    pub fn set_disabled(&self, reason: Option<String>) {
        *self.disabled_reason.lock() = reason;
    }

    /// Set the fix returned by `last_known()`.
    pub fn set_last_known(&self, fix: Option<LocationFix>) {
        *self.last_known.lock() = fix;
    }

    /// Deliver `event` to every active subscriber. Fixes also become the
    /// last known fix.
    pub fn emit(&self, event: PositionEvent) -> usize {
        if let PositionEvent::Fix(ref fix) = event {
            *self.last_known.lock() = Some(fix.clone());
        }

        let callbacks: Vec<PositionCallback> = self
            .active
            .lock()
            .values()
            .map(|(_, cb)| cb.clone())
            .collect();

        for callback in &callbacks {
            callback(event.clone());
        }
        callbacks.len()
    }

    /// Number of subscriptions currently held.
    pub fn active_subscriptions(&self) -> usize {
        self.active.lock().len()
    }

    /// Requests of the currently held subscriptions.
    pub fn active_requests(&self) -> Vec<PositionRequest> {
        self.active.lock().values().map(|(req, _)| *req).collect()
    }
}

impl PositionService for ManualPositionService {
    fn subscribe(
        &self,
        request: PositionRequest,
        callback: PositionCallback,
    ) -> Result<PositionSubscription, DeviceError> {
        if let Some(reason) = self.disabled_reason.lock().clone() {
            return Err(DeviceError::PositioningDisabled(reason));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.active.lock().insert(id, (request, callback));
        Ok(PositionSubscription::new(id))
    }

    fn unsubscribe(&self, handle: PositionSubscription) -> Result<(), DeviceError> {
        self.active
            .lock()
            .remove(&handle.id())
            .map(|_| ())
            .ok_or(DeviceError::UnknownSubscription(handle.id()))
    }

    fn last_known(&self) -> Option<LocationFix> {
        self.last_known.lock().clone()
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wake lock
// ─────────────────────────────────────────────────────────────────────────────

/// Wake lock tracked with a flag, counting acquisitions and releases.
///
/// Releasing a lock that is not held is reported as an error so unbalanced
/// use shows up in tests.
#[derive(Debug, Default)]
pub struct FlagWakeLock {
    unavailable: bool,
    held: AtomicBool,
    acquisitions: AtomicU64,
    releases: AtomicU64,
}

impl FlagWakeLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lock that can never be taken.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::Acquire)
    }

    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Acquire)
    }
}

impl WakeLock for FlagWakeLock {
    fn acquire(&self) -> Result<(), DeviceError> {
        if self.unavailable {
            return Err(DeviceError::WakeLockUnavailable(
                "power management denied".to_string(),
            ));
        }
        self.held.store(true, Ordering::Release);
        self.acquisitions.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn release(&self) -> Result<(), DeviceError> {
        if !self.held.swap(false, Ordering::AcqRel) {
            return Err(DeviceError::Platform(
                "wake lock released while not held".to_string(),
            ));
        }
        self.releases.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}
