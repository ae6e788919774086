//! Squared-delta noise gate over raw azimuth samples.
//!
//! # Gate Rule
//!
//! ```text
//! d = sample.azimuth - last_accepted
//! d² <  HEADING_THRESHOLD  → drop (state unchanged)
//! d² >= HEADING_THRESHOLD  → last_accepted = sample.azimuth, emit
//! ```
//!
//! This is a gate, not a smoothing average: an accepted sample replaces the
//! previous heading outright.
//!
//! # Wraparound
//!
//! The delta is a plain numeric difference. 359° and 1° are two degrees apart
//! on the dial but differ by 358 here, so crossing north always counts as a
//! large change. Callers relying on the gate must not assume circular
//! distance.

use tracing::{debug, warn};

use super::sample::{FilteredHeading, RawOrientationSample};

/// Minimum squared azimuth change (in degrees²) for a sample to be accepted.
pub const HEADING_THRESHOLD: f32 = 10.0;

/// What the filter currently knows about the heading.
///
/// `NoData` only holds until the very first sample has been accepted; a
/// dropped sample never moves the reading back to `NoData`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingReading {
    /// No sample has ever been accepted.
    NoData,
    /// The last accepted heading.
    Heading(FilteredHeading),
}

impl HeadingReading {
    /// The heading, if one has been accepted.
    pub fn heading(&self) -> Option<FilteredHeading> {
        match self {
            HeadingReading::NoData => None,
            HeadingReading::Heading(h) => Some(*h),
        }
    }

    /// Whether at least one sample has been accepted.
    pub fn has_data(&self) -> bool {
        matches!(self, HeadingReading::Heading(_))
    }
}

/// Result of offering one sample to the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOutcome {
    /// The sample moved the heading far enough and was accepted.
    Accepted(FilteredHeading),
    /// The change was below [`HEADING_THRESHOLD`].
    BelowThreshold,
    /// The azimuth was not a finite number.
    Invalid,
}

impl FilterOutcome {
    /// The new heading when the sample was accepted.
    pub fn heading(self) -> Option<FilteredHeading> {
        match self {
            FilterOutcome::Accepted(h) => Some(h),
            FilterOutcome::BelowThreshold | FilterOutcome::Invalid => None,
        }
    }

    /// Whether the sample was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterOutcome::Accepted(_))
    }
}

/// Noise gate turning raw orientation samples into a stable heading.
///
/// The filter starts with an unknown heading, so the first finite sample is
/// always accepted. After that a sample is accepted iff the square of its
/// difference from the last accepted azimuth reaches [`HEADING_THRESHOLD`].
///
/// Only ever touched from the engine's event thread.
#[derive(Debug, Default)]
pub struct OrientationFilter {
    /// Last accepted heading (`None` until the first sample).
    last_accepted: Option<FilteredHeading>,
    /// Samples accepted since construction.
    accepted: u64,
    /// Samples dropped since construction (below threshold or invalid).
    dropped: u64,
}

impl OrientationFilter {
    /// Create a filter with no heading yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate a sample, returning the new heading if it was accepted.
    pub fn accept(&mut self, sample: RawOrientationSample) -> Option<FilteredHeading> {
        self.offer(sample).heading()
    }

    /// Gate a sample and report why it was accepted or dropped.
    pub fn offer(&mut self, sample: RawOrientationSample) -> FilterOutcome {
        if !sample.is_valid() {
            self.dropped += 1;
            warn!(azimuth = sample.azimuth, "Dropping non-finite orientation sample");
            return FilterOutcome::Invalid;
        }

        if let Some(last) = self.last_accepted {
            let delta = sample.azimuth - last.degrees();
            if delta * delta < HEADING_THRESHOLD {
                self.dropped += 1;
                return FilterOutcome::BelowThreshold;
            }
        }

        let heading = FilteredHeading::new(sample.azimuth);
        debug!(
            from = ?self.last_accepted.map(|h| h.degrees()),
            to = format!("{:.2}", sample.azimuth),
            pitch = sample.pitch,
            roll = sample.roll,
            "Compass direction changed"
        );

        self.last_accepted = Some(heading);
        self.accepted += 1;
        FilterOutcome::Accepted(heading)
    }

    /// Current reading, distinguishing "never received" from a heading.
    pub fn reading(&self) -> HeadingReading {
        match self.last_accepted {
            Some(h) => HeadingReading::Heading(h),
            None => HeadingReading::NoData,
        }
    }

    /// Number of samples accepted so far.
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Number of samples dropped so far.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}
