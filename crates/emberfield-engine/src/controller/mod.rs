//! Scene lifecycle controllers.
//!
//! A controller owns one decorative scene from dormancy to disposal:
//! - `BackdropController` drives the pointer-reactive particle field,
//!   activated lazily when its host element scrolls into view.
//! - `EmblemController` drives the tumbling wireframe sphere, same
//!   activation pattern but only on desktop-sized viewports.
//!
//! Both follow the same three-phase state machine. A controller starts
//! `Dormant`, becomes `Active` on successful activation, and ends `Disposed`
//! after its resources are released. Activation failures are terminal: the
//! controller logs one warning and stays `Dormant` forever.

mod backdrop;
mod emblem;

#[cfg(test)]
pub(crate) mod fake;

pub use backdrop::{BackdropConfig, BackdropController};
pub use emblem::{EmblemConfig, EmblemController, DESKTOP_MIN_WIDTH};

use std::fmt;

/// Lifecycle phase of a controller.
///
/// Transitions only ever move forward: `Dormant → Active → Disposed`, or
/// `Dormant → Disposed` when a never-activated controller is torn down.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Created but not activated; holds no backend resources.
    Dormant,
    /// Scene built, context live, animating.
    Active,
    /// Resources released; the controller is inert.
    Disposed,
}

/// Why activation failed.
///
/// Every variant is terminal. The controller records the failure, logs one
/// warning, and ignores all further activation attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// The rendering backend could not provide a context.
    BackendUnavailable(String),
    /// No surface was supplied to bind the context to.
    MissingTarget,
}

impl fmt::Display for ActivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationError::BackendUnavailable(msg) => {
                write!(f, "rendering backend unavailable: {msg}")
            }
            ActivationError::MissingTarget => write!(f, "no rendering target supplied"),
        }
    }
}

impl std::error::Error for ActivationError {}
