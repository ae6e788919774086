//! Single-consumer engine loop.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::event::{ChannelCallbacks, EngineEvent};
use super::handle::{EngineHandle, EngineSnapshot};
use crate::device::PositionEvent;
use crate::display::DisplayState;
use crate::lifecycle::{
    CoordinatorConfig, Generation, LifecycleCoordinator, LifecycleServices, LifecycleState,
};
use crate::location::{LocationPipeline, ReverseGeocoder};
use crate::orientation::{OrientationFilter, RawOrientationSample};
use crate::renderer::{CompassRenderer, RedrawSink};

/// Owns all compass state and applies queued events one at a time.
///
/// The engine starts in the background. Send [`EngineEvent::Foreground`]
/// (or call [`EngineHandle::foreground`]) to acquire the device resources.
pub struct CompassEngine {
    filter: OrientationFilter,
    renderer: CompassRenderer,
    coordinator: LifecycleCoordinator,
    pipeline: LocationPipeline,
    display: DisplayState,

    tx: UnboundedSender<EngineEvent>,
    rx: UnboundedReceiver<EngineEvent>,
    snapshots: watch::Sender<EngineSnapshot>,
}

impl CompassEngine {
    /// Build an engine over the given device services.
    ///
    /// The location readout is seeded from the position service's last
    /// known fix, so it may be geocoded here. Build the engine outside of
    /// an async context when `geocoder` blocks.
    pub fn new(
        services: LifecycleServices,
        geocoder: Arc<dyn ReverseGeocoder>,
        sink: Arc<dyn RedrawSink>,
        config: CoordinatorConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let callbacks = Arc::new(ChannelCallbacks::new(tx.clone()));

        let pipeline = LocationPipeline::new(geocoder);
        let mut display = DisplayState::new();
        let last_known = services.positions.last_known();
        if last_known.is_some() {
            debug!(
                provider = services.positions.provider_name(),
                "Seeding location from last known fix"
            );
        }
        display.set_location(pipeline.update(last_known.as_ref(), Utc::now()));

        let coordinator = LifecycleCoordinator::new(services, callbacks, config);
        let (snapshots, _) = watch::channel(EngineSnapshot::default());

        let engine = Self {
            filter: OrientationFilter::new(),
            renderer: CompassRenderer::new(sink),
            coordinator,
            pipeline,
            display,
            tx,
            rx,
            snapshots,
        };
        engine.publish();
        engine
    }

    /// Handle for queueing events and watching snapshots.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle::new(self.tx.clone(), self.snapshots.subscribe())
    }

    /// Apply one event. Returns whether it changed engine state.
    ///
    /// Samples from a stale generation, samples the filter drops and
    /// out-of-order lifecycle transitions all return `false`.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        let applied = match event {
            EngineEvent::Foreground => self.enter_foreground(),
            EngineEvent::Background => self.coordinator.deactivate().is_ok(),
            EngineEvent::Orientation { generation, sample } => {
                self.on_orientation(generation, sample)
            }
            EngineEvent::Position { generation, event } => self.on_position(generation, event),
            EngineEvent::Shutdown => self.release_if_active(),
        };

        if applied {
            self.publish();
        }
        applied
    }

    /// Apply every event already queued, without waiting. Returns how many
    /// were handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Consume events until shutdown or cancellation, then release any held
    /// resources.
    ///
    /// Each event is handled inline on the runtime thread, so the geocoder
    /// must not block here. Hosts using [`NominatimGeocoder`] should use
    /// [`spawn`](Self::spawn) instead.
    ///
    /// # Panics
    ///
    /// Panics if a position fix reaches a geocoder built on
    /// `reqwest::blocking` while this future runs inside a tokio runtime.
    ///
    /// [`NominatimGeocoder`]: crate::location::NominatimGeocoder
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!("Compass engine started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Engine cancelled");
                    break;
                }
                event = self.rx.recv() => {
                    let Some(event) = event else { break };
                    let stop = event == EngineEvent::Shutdown;
                    self.handle_event(event);
                    if stop {
                        break;
                    }
                }
            }
        }
        self.release_if_active();
        self.publish();
        info!("Compass engine stopped");
    }

    /// Run the loop on a dedicated thread until [`EngineEvent::Shutdown`].
    ///
    /// The thread may block on geocoding lookups without affecting any async
    /// runtime the host uses. The engine is handed back on join.
    pub fn spawn(mut self) -> io::Result<JoinHandle<Self>> {
        thread::Builder::new()
            .name("compass-engine".to_string())
            .spawn(move || {
                info!("Compass engine thread started");
                while let Some(event) = self.rx.blocking_recv() {
                    let stop = event == EngineEvent::Shutdown;
                    self.handle_event(event);
                    if stop {
                        break;
                    }
                }
                self.release_if_active();
                self.publish();
                info!("Compass engine thread stopped");
                self
            })
    }

    /// Current state as published to hosts.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            display: self.display.clone(),
            heading: self
                .renderer
                .current_heading()
                .filter(|_| self.display.sensor_available()),
            lifecycle: self.coordinator.state(),
            generation: self.coordinator.generation(),
            resources: self.coordinator.resources(),
            redraw_requests: self.renderer.redraw_requests(),
            accepted: self.filter.accepted_count(),
            dropped: self.filter.dropped_count(),
        }
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn renderer(&self) -> &CompassRenderer {
        &self.renderer
    }

    pub fn filter(&self) -> &OrientationFilter {
        &self.filter
    }

    pub fn coordinator(&self) -> &LifecycleCoordinator {
        &self.coordinator
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.coordinator.state()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn enter_foreground(&mut self) -> bool {
        match self.coordinator.activate() {
            Ok(report) => {
                self.display
                    .set_availability(report.sensor.is_ok(), report.position.is_ok());
                true
            }
            Err(_) => false,
        }
    }

    fn release_if_active(&mut self) -> bool {
        self.coordinator.state().is_active() && self.coordinator.deactivate().is_ok()
    }

    fn on_orientation(&mut self, generation: Generation, sample: RawOrientationSample) -> bool {
        if !self.coordinator.accepts(generation) {
            debug!(%generation, current = %self.coordinator.generation(), "Dropping stale orientation sample");
            return false;
        }

        match self.filter.accept(sample) {
            Some(heading) => {
                self.display.record_sample(sample);
                self.renderer.on_heading(heading);
                true
            }
            None => false,
        }
    }

    fn on_position(&mut self, generation: Generation, event: PositionEvent) -> bool {
        if !self.coordinator.accepts(generation) {
            debug!(%generation, "Dropping stale position event");
            return false;
        }

        match event {
            PositionEvent::Fix(fix) => {
                let readout = self.pipeline.update(Some(&fix), Utc::now());
                self.display.set_location(readout);
            }
            PositionEvent::Status(status) => self.display.set_satellites(status),
        }
        true
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
