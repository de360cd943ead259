//! Byte order swapping.
//!
//! Tipsy files are written in whatever byte order the producing machine
//! used. Every scalar in the format is 2, 4 or 8 bytes wide, so a single
//! fixed-width reversal covers the header fields and every particle word.

/// Reverse a 2-, 4- or 8-byte scalar in place.
///
/// Bytes are exchanged pairwise with an XOR swap, from the outside in.
#[inline]
pub fn swap_in_place(bytes: &mut [u8]) {
    debug_assert!(matches!(bytes.len(), 2 | 4 | 8), "unsupported scalar width {}", bytes.len());
    let n = bytes.len();
    for i in 0..n / 2 {
        let j = n - i - 1;
        bytes[i] ^= bytes[j];
        bytes[j] ^= bytes[i];
        bytes[i] ^= bytes[j];
    }
}

/// Fixed-width scalars that can have their byte order reversed.
pub trait ByteSwap: Copy {
    /// Return the value with its bytes reversed.
    fn byteswap(self) -> Self;
}

macro_rules! impl_byteswap {
    ($($t:ty),* $(,)?) => {
        $(
            impl ByteSwap for $t {
                #[inline]
                fn byteswap(self) -> Self {
                    let mut bytes = self.to_ne_bytes();
                    swap_in_place(&mut bytes);
                    <$t>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_byteswap!(u16, i16, u32, i32, f32, u64, i64, f64);

/// Swap `value` only when `swap` is set.
#[inline]
pub fn maybe_swap<T: ByteSwap>(value: T, swap: bool) -> T {
    if swap { value.byteswap() } else { value }
}

/// Swap every 4-byte word in a buffer.
pub fn swap_words(words: &mut [u32]) {
    for w in words.iter_mut() {
        *w = w.byteswap();
    }
}
