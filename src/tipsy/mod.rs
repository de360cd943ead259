//! Tipsy snapshot binary format.
//!
//! A tipsy file is a fixed header followed by three flat particle arrays.
//! There is no magic number, version or byte-order marker; the layout
//! (padding and byte order) is configured per file with [`CodecOptions`].
//!
//! ## File Structure
//!
//! ```text
//! +------------------+
//! | time             |  8 bytes (f64)
//! +------------------+
//! | nbodies          |  4 bytes (i32)
//! | ndim             |  4 bytes (i32)
//! | nsph             |  4 bytes (i32)
//! | ndark            |  4 bytes (i32)
//! | nstar            |  4 bytes (i32)
//! +------------------+
//! | pad (optional)   |  4 bytes (i32)
//! +------------------+
//! | gas  x nsph      |  48 bytes each
//! | dark x ndark     |  36 bytes each
//! | star x nstar     |  44 bytes each
//! +------------------+
//! ```

mod codec;
mod file;
mod format;
mod records;

pub use codec::*;
pub use file::*;
pub use format::*;
pub use records::*;
