//! Resource acquisition bound to the foreground lifecycle.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::error::LifecycleError;
use super::state::{Generation, LifecycleState};
use crate::device::{
    DeviceError, OrientationCallback, PositionCallback, PositionRequest, PositionService,
    PositionSubscription, SensorKind, SensorRate, SensorService, SensorSubscription, WakeLock,
};

/// The resources bound to the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    PositionUpdates,
    OrientationSensor,
    WakeLock,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::PositionUpdates => write!(f, "position updates"),
            Resource::OrientationSensor => write!(f, "orientation sensor"),
            Resource::WakeLock => write!(f, "wake lock"),
        }
    }
}

/// Device services the coordinator acquires resources from.
#[derive(Clone)]
pub struct LifecycleServices {
    pub sensors: Arc<dyn SensorService>,
    pub positions: Arc<dyn PositionService>,
    pub wake_lock: Arc<dyn WakeLock>,
}

/// Builds the callbacks registered with the device services.
///
/// The coordinator only wires data paths; what a callback does with a sample
/// is up to the factory. Each callback is built for one generation and
/// should tag what it forwards with it.
pub trait CallbackFactory: Send + Sync {
    fn orientation(&self, generation: Generation) -> OrientationCallback;
    fn position(&self, generation: Generation) -> PositionCallback;
}

/// Acquisition parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinatorConfig {
    /// Filter for position updates (10 s / 10 m by default).
    pub position_request: PositionRequest,
    /// Orientation delivery rate (normal by default).
    pub sensor_rate: SensorRate,
}

/// Outcome of one `activate()`, per resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub generation: Generation,
    pub position: Result<(), DeviceError>,
    pub sensor: Result<(), DeviceError>,
    pub wake_lock: Result<(), DeviceError>,
}

impl ActivationReport {
    /// Whether every resource was acquired.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Resources that could not be acquired.
    pub fn missing(&self) -> Vec<Resource> {
        let mut missing = Vec::new();
        if self.position.is_err() {
            missing.push(Resource::PositionUpdates);
        }
        if self.sensor.is_err() {
            missing.push(Resource::OrientationSensor);
        }
        if self.wake_lock.is_err() {
            missing.push(Resource::WakeLock);
        }
        missing
    }
}

/// Which resources the coordinator holds right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceSnapshot {
    pub position: bool,
    pub sensor: bool,
    pub wake_lock: bool,
}

impl ResourceSnapshot {
    pub fn all_held(&self) -> bool {
        self.position && self.sensor && self.wake_lock
    }

    pub fn none_held(&self) -> bool {
        !self.position && !self.sensor && !self.wake_lock
    }
}

/// Acquires and releases device resources on foreground/background.
///
/// `activate()` and `deactivate()` must alternate, starting with
/// `activate()`. Out-of-order calls are rejected with a [`LifecycleError`]
/// and change nothing.
pub struct LifecycleCoordinator {
    services: LifecycleServices,
    callbacks: Arc<dyn CallbackFactory>,
    config: CoordinatorConfig,

    state: LifecycleState,
    generation: Generation,

    position: Option<PositionSubscription>,
    sensor: Option<SensorSubscription>,
    wake_lock_held: bool,
}

impl fmt::Debug for LifecycleCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCoordinator")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("resources", &self.resources())
            .finish()
    }
}

impl LifecycleCoordinator {
    pub fn new(
        services: LifecycleServices,
        callbacks: Arc<dyn CallbackFactory>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            services,
            callbacks,
            config,
            state: LifecycleState::Inactive,
            generation: Generation::default(),
            position: None,
            sensor: None,
            wake_lock_held: false,
        }
    }

    /// Enter the foreground: position updates, orientation sensor, wake lock.
    ///
    /// Resources that are unavailable are skipped and reported; the
    /// coordinator becomes `Active` regardless.
    pub fn activate(&mut self) -> Result<ActivationReport, LifecycleError> {
        if self.state.is_active() {
            warn!(generation = %self.generation, "activate() while already active, ignoring");
            return Err(LifecycleError::AlreadyActive(self.generation));
        }

        self.generation = self.generation.next();
        let generation = self.generation;

        // 1. Position updates
        let position = self
            .services
            .positions
            .subscribe(
                self.config.position_request,
                self.callbacks.position(generation),
            )
            .map(|handle| self.position = Some(handle));
        if let Err(ref e) = position {
            warn!(error = %e, "Position updates unavailable");
        }

        // 2. Orientation sensor
        let sensor = self
            .services
            .sensors
            .subscribe(
                SensorKind::Orientation,
                self.config.sensor_rate,
                self.callbacks.orientation(generation),
            )
            .map(|handle| self.sensor = Some(handle));
        if let Err(ref e) = sensor {
            warn!(error = %e, "Orientation sensor unavailable");
        }

        // 3. Keep-awake lock
        let wake_lock = self
            .services
            .wake_lock
            .acquire()
            .map(|()| self.wake_lock_held = true);
        if let Err(ref e) = wake_lock {
            warn!(error = %e, "Wake lock unavailable");
        }

        self.state = LifecycleState::Active;

        let report = ActivationReport {
            generation,
            position,
            sensor,
            wake_lock,
        };
        info!(
            generation = %generation,
            min_interval_ms = self.config.position_request.min_interval.as_millis() as u64,
            min_distance_m = self.config.position_request.min_distance_m,
            sensor_rate = %self.config.sensor_rate,
            missing = ?report.missing(),
            "Lifecycle activated"
        );

        Ok(report)
    }

    /// Leave the foreground, releasing resources in reverse order.
    ///
    /// Resources that were never acquired are skipped. A release failure is
    /// logged and the resource is still considered released.
    pub fn deactivate(&mut self) -> Result<(), LifecycleError> {
        if !self.state.is_active() {
            warn!("deactivate() while inactive, ignoring");
            return Err(LifecycleError::NotActive);
        }

        if self.wake_lock_held {
            if let Err(e) = self.services.wake_lock.release() {
                warn!(error = %e, "Failed to release wake lock");
            }
            self.wake_lock_held = false;
        }

        if let Some(handle) = self.sensor.take() {
            if let Err(e) = self.services.sensors.unsubscribe(handle) {
                warn!(error = %e, "Failed to unsubscribe orientation sensor");
            }
        }

        if let Some(handle) = self.position.take() {
            if let Err(e) = self.services.positions.unsubscribe(handle) {
                warn!(error = %e, "Failed to unsubscribe position updates");
            }
        }

        self.state = LifecycleState::Inactive;
        info!(generation = %self.generation, "Lifecycle deactivated");
        Ok(())
    }

    /// Whether an event tagged with `generation` may still be applied.
    pub fn accepts(&self, generation: Generation) -> bool {
        self.state.is_active() && generation == self.generation
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Generation of the current (or most recent) activation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn resources(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            position: self.position.is_some(),
            sensor: self.sensor.is_some(),
            wake_lock: self.wake_lock_held,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::manual::{FlagWakeLock, ManualPositionService, ManualSensorService};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records which generations callbacks were built for.
    #[derive(Default)]
    struct RecordingCallbacks {
        orientation: Mutex<Vec<Generation>>,
        position: Mutex<Vec<Generation>>,
    }

    impl CallbackFactory for RecordingCallbacks {
        fn orientation(&self, generation: Generation) -> OrientationCallback {
            self.orientation.lock().unwrap().push(generation);
            Arc::new(|_| {})
        }

        fn position(&self, generation: Generation) -> PositionCallback {
            self.position.lock().unwrap().push(generation);
            Arc::new(|_| {})
        }
    }

    struct Fixture {
        sensors: Arc<ManualSensorService>,
        positions: Arc<ManualPositionService>,
        wake_lock: Arc<FlagWakeLock>,
        callbacks: Arc<RecordingCallbacks>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with(
                ManualSensorService::new(),
                ManualPositionService::new("gps"),
                FlagWakeLock::new(),
            )
        }

        fn with(
            sensors: ManualSensorService,
            positions: ManualPositionService,
            wake_lock: FlagWakeLock,
        ) -> Self {
            Self {
                sensors: Arc::new(sensors),
                positions: Arc::new(positions),
                wake_lock: Arc::new(wake_lock),
                callbacks: Arc::new(RecordingCallbacks::default()),
            }
        }

        fn coordinator(&self) -> LifecycleCoordinator {
            let services = LifecycleServices {
                sensors: self.sensors.clone(),
                positions: self.positions.clone(),
                wake_lock: self.wake_lock.clone(),
            };
            LifecycleCoordinator::new(
                services,
                self.callbacks.clone(),
                CoordinatorConfig::default(),
            )
        }

        fn platform_holds_all(&self) -> bool {
            self.sensors.active_subscriptions() == 1
                && self.positions.active_subscriptions() == 1
                && self.wake_lock.is_held()
        }

        fn platform_holds_none(&self) -> bool {
            self.sensors.active_subscriptions() == 0
                && self.positions.active_subscriptions() == 0
                && !self.wake_lock.is_held()
        }
    }

    #[test]
    fn test_initial_state() {
        let fixture = Fixture::new();
        let coordinator = fixture.coordinator();

        assert_eq!(coordinator.state(), LifecycleState::Inactive);
        assert!(coordinator.resources().none_held());
        assert!(!coordinator.accepts(coordinator.generation()));
    }

    #[test]
    fn test_activate_acquires_all_resources() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();

        let report = coordinator.activate().unwrap();

        assert!(report.is_complete());
        assert_eq!(coordinator.state(), LifecycleState::Active);
        assert!(coordinator.resources().all_held());
        assert!(fixture.platform_holds_all());
        assert!(coordinator.accepts(report.generation));
    }

    #[test]
    fn test_activate_uses_configured_request_and_rate() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();
        coordinator.activate().unwrap();

        let requests = fixture.positions.active_requests();
        assert_eq!(requests[0].min_interval, Duration::from_millis(10_000));
        assert_eq!(requests[0].min_distance_m, 10.0);
        assert_eq!(fixture.sensors.active_rates(), vec![SensorRate::Normal]);
    }

    #[test]
    fn test_deactivate_releases_everything() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();
        let report = coordinator.activate().unwrap();

        coordinator.deactivate().unwrap();

        assert_eq!(coordinator.state(), LifecycleState::Inactive);
        assert!(coordinator.resources().none_held());
        assert!(fixture.platform_holds_none());
        assert!(!coordinator.accepts(report.generation));
    }

    #[test]
    fn test_repeated_cycles_do_not_leak() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();

        for cycle in 1..=5u64 {
            let report = coordinator.activate().unwrap();
            assert_eq!(report.generation.value(), cycle);
            assert!(fixture.platform_holds_all());

            coordinator.deactivate().unwrap();
            assert!(fixture.platform_holds_none());
        }

        assert_eq!(fixture.wake_lock.acquisitions(), 5);
        assert_eq!(fixture.wake_lock.releases(), 5);
        assert_eq!(fixture.sensors.registered_callbacks().len(), 5);
    }

    #[test]
    fn test_callbacks_built_per_generation() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();

        coordinator.activate().unwrap();
        coordinator.deactivate().unwrap();
        coordinator.activate().unwrap();

        let generations: Vec<u64> = fixture
            .callbacks
            .orientation
            .lock()
            .unwrap()
            .iter()
            .map(Generation::value)
            .collect();
        assert_eq!(generations, vec![1, 2]);
        assert_eq!(fixture.callbacks.position.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_stale_generation_rejected_after_reactivation() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();

        let first = coordinator.activate().unwrap().generation;
        coordinator.deactivate().unwrap();
        let second = coordinator.activate().unwrap().generation;

        assert!(!coordinator.accepts(first));
        assert!(coordinator.accepts(second));
    }

    #[test]
    fn test_missing_sensor_does_not_block_activation() {
        let fixture = Fixture::with(
            ManualSensorService::unavailable(),
            ManualPositionService::new("gps"),
            FlagWakeLock::new(),
        );
        let mut coordinator = fixture.coordinator();

        let report = coordinator.activate().unwrap();

        assert_eq!(report.missing(), vec![Resource::OrientationSensor]);
        assert_eq!(coordinator.state(), LifecycleState::Active);
        let resources = coordinator.resources();
        assert!(resources.position && resources.wake_lock && !resources.sensor);

        // Releasing tolerates the resource that was never acquired
        coordinator.deactivate().unwrap();
        assert!(fixture.platform_holds_none());
    }

    #[test]
    fn test_all_resources_missing() {
        let fixture = Fixture::with(
            ManualSensorService::unavailable(),
            ManualPositionService::disabled("gps", "off"),
            FlagWakeLock::unavailable(),
        );
        let mut coordinator = fixture.coordinator();

        let report = coordinator.activate().unwrap();
        assert_eq!(
            report.missing(),
            vec![
                Resource::PositionUpdates,
                Resource::OrientationSensor,
                Resource::WakeLock
            ]
        );
        assert!(coordinator.resources().none_held());
        assert!(coordinator.deactivate().is_ok());
    }

    #[test]
    fn test_double_activate_is_rejected_without_side_effects() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();
        let report = coordinator.activate().unwrap();

        let err = coordinator.activate().unwrap_err();

        assert_eq!(err, LifecycleError::AlreadyActive(report.generation));
        assert_eq!(fixture.sensors.active_subscriptions(), 1);
        assert_eq!(fixture.positions.active_subscriptions(), 1);
        assert_eq!(fixture.wake_lock.acquisitions(), 1);
        assert!(coordinator.accepts(report.generation));
    }

    #[test]
    fn test_deactivate_without_activate_is_rejected() {
        let fixture = Fixture::new();
        let mut coordinator = fixture.coordinator();

        assert_eq!(coordinator.deactivate(), Err(LifecycleError::NotActive));
        assert_eq!(fixture.wake_lock.releases(), 0);

        coordinator.activate().unwrap();
        coordinator.deactivate().unwrap();
        assert_eq!(coordinator.deactivate(), Err(LifecycleError::NotActive));
        assert_eq!(fixture.wake_lock.releases(), 1);
    }
}
