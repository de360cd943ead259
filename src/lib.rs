//! # tipsy-scene
//!
//! Reader/writer for tipsy N-body snapshot files, and a scene generator that
//! turns a sequence of snapshots into interpolation instructions for
//! rendering frames evenly spaced in simulation time.
//!
//! ## Modules
//!
//! - [`util`] - Errors and byte-order swapping
//! - [`tipsy`] - Binary header and particle codec, snapshot files
//! - [`scene`] - Timeline, frame generation, file lists and scene output
//!
//! ## Example
//!
//! ```ignore
//! use tipsy_scene::prelude::*;
//!
//! let sources = vec![
//!     SnapshotSource::new("00010", "sim/run.00010"),
//!     SnapshotSource::new("00020", "sim/run.00020"),
//! ];
//! let timeline = load_timeline(&sources, CodecOptions::default())?;
//! for frame in generate(&timeline, 24)? {
//!     println!("{} {} {}", frame.lower, frame.upper, frame.fraction);
//! }
//! ```

pub mod util;
pub mod tipsy;
pub mod scene;

// Re-export commonly used types
pub use util::{Error, Result};
pub use tipsy::{CodecOptions, Header, SnapshotFile};
pub use scene::{Interpolation, SceneGenerator, Timeline};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::tipsy::{
        CodecOptions, DarkParticle, GasParticle, Header, ParticleKind, ParticleSet, SnapshotFile,
        StarParticle,
    };
    pub use crate::scene::{
        generate, load_timeline, Interpolation, SceneConfig, SceneGenerator, SnapshotEntry,
        SnapshotSource, Timeline,
    };
}
