//! Snapshot timeline and frame interpolation.
//!
//! - [`Timeline`] - snapshot ids and times in ascending order
//! - [`SceneGenerator`] - evenly spaced frames as bracketing pairs
//! - [`load_timeline`] - parallel header reads feeding a timeline
//! - [`manifest`] / [`output`] - file lists in, scene files out

mod generator;
mod loader;
pub mod manifest;
pub mod output;
mod timeline;

pub use generator::*;
pub use loader::*;
pub use timeline::*;
