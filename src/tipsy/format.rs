//! Tipsy format constants and layout options.

/// Size of the f64 time field.
pub const TIME_SIZE: usize = 8;

/// Size of every integer and particle word in the format.
pub const WORD_SIZE: usize = 4;

/// Number of i32 body-count fields after the time (nbodies, ndim, nsph, ndark, nstar).
pub const NUM_COUNT_FIELDS: usize = 5;

/// Header size with the trailing pad word.
pub const HEADER_SIZE_PADDED: usize = TIME_SIZE + (NUM_COUNT_FIELDS + 1) * WORD_SIZE;

/// Header size without the trailing pad word.
pub const HEADER_SIZE_UNPADDED: usize = HEADER_SIZE_PADDED - WORD_SIZE;

/// Size in bytes of the header for the given padding setting.
#[inline]
pub const fn header_size(has_padding: bool) -> usize {
    if has_padding {
        HEADER_SIZE_PADDED
    } else {
        HEADER_SIZE_UNPADDED
    }
}

/// Per-file layout configuration.
///
/// A tipsy file carries no byte-order marker or layout version, so the
/// reader has to be told both. The defaults match the files produced by the
/// common big-endian simulation codes read on little-endian hosts: a padded
/// header and swapped byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodecOptions {
    /// Header carries the trailing pad word.
    pub has_padding: bool,
    /// Scalars on disk are in the opposite byte order to the host.
    pub swap_endian: bool,
}

impl CodecOptions {
    /// Padded header, swapped byte order.
    pub const fn new() -> Self {
        Self { has_padding: true, swap_endian: true }
    }

    /// Padded header, host byte order.
    pub const fn native() -> Self {
        Self { has_padding: true, swap_endian: false }
    }

    pub const fn with_padding(mut self, has_padding: bool) -> Self {
        self.has_padding = has_padding;
        self
    }

    pub const fn with_swap(mut self, swap_endian: bool) -> Self {
        self.swap_endian = swap_endian;
        self
    }

    /// Header size for this configuration.
    #[inline]
    pub const fn header_size(&self) -> usize {
        header_size(self.has_padding)
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::new()
    }
}
