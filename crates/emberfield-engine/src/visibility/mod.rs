//! Visibility signals.
//!
//! Backdrop activation is lazy: a controller stays dormant until the section
//! it decorates has been visible at least once. `VisibilityGate` turns a
//! stream of visible-fraction reports into a one-shot activation signal.

mod gate;

pub use gate::{DEFAULT_THRESHOLD, VisibilityGate};
