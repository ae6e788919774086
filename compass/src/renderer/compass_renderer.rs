//! Heading-driven compass renderer.

use std::sync::Arc;

use super::sink::RedrawSink;
use super::transform::{RenderTransform, SurfaceBounds};
use crate::orientation::FilteredHeading;

/// Holds the displayed heading and requests redraws when it changes.
///
/// Every accepted heading produces exactly one redraw request at that exact
/// angle; there is no animation between headings.
pub struct CompassRenderer {
    /// Heading currently shown (`None` before the first accepted sample).
    heading: Option<FilteredHeading>,
    /// Where redraw requests go.
    sink: Arc<dyn RedrawSink>,
    /// Redraw requests issued so far.
    redraw_requests: u64,
}

impl std::fmt::Debug for CompassRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompassRenderer")
            .field("heading", &self.heading)
            .field("redraw_requests", &self.redraw_requests)
            .finish()
    }
}

impl CompassRenderer {
    /// Create a renderer that sends redraw requests to `sink`.
    pub fn new(sink: Arc<dyn RedrawSink>) -> Self {
        Self {
            heading: None,
            sink,
            redraw_requests: 0,
        }
    }

    /// Store a new heading and request one redraw.
    pub fn on_heading(&mut self, heading: FilteredHeading) {
        self.heading = Some(heading);
        self.redraw_requests += 1;
        self.sink.request_redraw();
    }

    /// Transform for the current heading on a surface of `bounds`.
    ///
    /// Before any heading is known the needle is drawn pointing up
    /// (heading 0, rotation 360).
    pub fn compute_transform(&self, bounds: SurfaceBounds) -> RenderTransform {
        let degrees = self.heading.map(|h| h.degrees()).unwrap_or(0.0);
        RenderTransform::for_heading(degrees, bounds)
    }

    /// Heading currently displayed.
    pub fn current_heading(&self) -> Option<FilteredHeading> {
        self.heading
    }

    /// Number of redraws requested so far.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }
}
