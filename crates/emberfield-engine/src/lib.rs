//! Emberfield engine crate.
//!
//! Renders decorative 3D backdrops behind application content: a
//! pointer-reactive particle field and a slowly tumbling wireframe emblem.
//! Each backdrop is owned by a controller with an explicit
//! `Dormant -> Active -> Disposed` lifecycle, activated lazily by a one-shot
//! visibility signal and torn down deterministically.

pub mod backend;
pub mod controller;
pub mod device;
pub mod input;
pub mod render;
pub mod scene;
pub mod time;
pub mod visibility;

pub mod logging;
