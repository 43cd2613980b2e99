//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform pointer events into
//! `PointerTracker` updates.

mod pointer;

pub use pointer::PointerTracker;
