//! Text readouts shown next to the compass dial.
//!
//! [`DisplayState`] is what a host renders as text: the raw sensor angles,
//! the location block and the satellites line. It is updated only by the
//! engine and handed to hosts as a cloned snapshot.

mod state;

pub use state::{
    DisplayState, LAST_KNOWN_LABEL, NO_SENSOR_DATA, POSITIONING_UNAVAILABLE, SENSOR_UNAVAILABLE,
};
