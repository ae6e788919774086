//! Compass needle rendering.
//!
//! The renderer holds the current [`FilteredHeading`](crate::orientation::FilteredHeading)
//! and turns it into a [`RenderTransform`] whenever the hosting surface draws.
//! It never draws anything itself: it asks a [`RedrawSink`] for a redraw and
//! the host's draw callback pulls the transform for its current bounds.
//!
//! # Direction Convention
//!
//! The needle graphic is counter-rotated by `360° - heading` about the
//! surface centre. On a y-down surface a positive angle turns clockwise, so
//! turning the device clockwise (increasing heading) makes north swing
//! anticlockwise on screen, as a real compass card does.

mod compass_renderer;
mod sink;
mod transform;

pub use compass_renderer::CompassRenderer;
pub use sink::{CountingRedrawSink, RedrawSink};
pub use transform::{RenderTransform, SurfaceBounds};
