//! Utility types and functions for tipsy.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`ByteSwap`] - Fixed-width byte order reversal

mod error;
mod swap;

pub use error::*;
pub use swap::*;
