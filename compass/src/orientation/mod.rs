//! Orientation samples and the heading noise gate.
//!
//! Raw samples arrive from the orientation sensor subscription at the
//! configured delivery rate. Most of them differ from the previous one by a
//! fraction of a degree, which would make the compass needle jitter. The
//! [`OrientationFilter`] suppresses those small changes and only emits a new
//! [`FilteredHeading`] when the azimuth moved far enough.
//!
//! ```text
//! RawOrientationSample ──► OrientationFilter ──► FilteredHeading ──► CompassRenderer
//!                          (squared-delta gate)   (last accepted)
//! ```
//!
//! # Example
//!
//! ```
//! use compass::orientation::{OrientationFilter, RawOrientationSample};
//!
//! let mut filter = OrientationFilter::new();
//!
//! // The first sample is always accepted
//! assert!(filter.accept(RawOrientationSample::from_azimuth(10.0)).is_some());
//!
//! // 1° of jitter is dropped
//! assert!(filter.accept(RawOrientationSample::from_azimuth(11.0)).is_none());
//! ```

mod filter;
mod sample;

pub use filter::{FilterOutcome, HeadingReading, OrientationFilter, HEADING_THRESHOLD};
pub use sample::{FilteredHeading, RawOrientationSample};
