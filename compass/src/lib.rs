//! Compass - heading display engine
//!
//! This library turns raw orientation sensor samples into a stable compass
//! heading and binds the device resources that produce them to the
//! foreground lifecycle of the display.
//!
//! # Architecture
//!
//! ```text
//! device ──► engine ──► orientation (noise gate) ──► renderer ──► host redraw
//!   ▲          │
//!   │          ├──► location (fix → readout, reverse geocoding)
//!   │          └──► display (text readouts)
//!   └── lifecycle (acquire on foreground, release on background)
//! ```
//!
//! - [`orientation`] - sample types and the squared-delta noise gate
//! - [`renderer`] - heading to rotation transform, redraw requests
//! - [`lifecycle`] - resource acquisition tied to foreground/background
//! - [`device`] - platform service traits and manual implementations
//! - [`location`] - location readout and reverse geocoding
//! - [`display`] - text readouts for hosts
//! - [`engine`] - single-consumer event loop tying it all together
//! - [`config`] - INI configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod device;
pub mod display;
pub mod engine;
pub mod lifecycle;
pub mod location;
pub mod logging;
pub mod orientation;
pub mod renderer;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
