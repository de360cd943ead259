//! Header and particle encoding.
//!
//! Raw scalars are read in host byte order and swapped afterwards when the
//! file's [`CodecOptions::swap_endian`] is set. Particle arrays are swapped
//! as a flat run of 4-byte words, since every particle field is an f32.

use std::io::Write;

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use super::format::{header_size, CodecOptions};
use super::records::{Header, Particle, ParticleKind};
use crate::util::{maybe_swap, swap_in_place, swap_words, Error, Result};

/// Decode a header from the start of `bytes`.
///
/// Reads 32 bytes, or 28 when the layout has no pad word.
pub fn decode_header(bytes: &[u8], options: CodecOptions) -> Result<Header> {
    let size = header_size(options.has_padding);
    if bytes.len() < size {
        return Err(Error::truncated("header", size, bytes.len()));
    }

    let swap = options.swap_endian;
    let mut rdr = &bytes[..size];

    let time = maybe_swap(rdr.read_f64::<NativeEndian>()?, swap);
    let nbodies = maybe_swap(rdr.read_i32::<NativeEndian>()?, swap);
    let ndim = maybe_swap(rdr.read_i32::<NativeEndian>()?, swap);
    let nsph = maybe_swap(rdr.read_i32::<NativeEndian>()?, swap);
    let ndark = maybe_swap(rdr.read_i32::<NativeEndian>()?, swap);
    let nstar = maybe_swap(rdr.read_i32::<NativeEndian>()?, swap);
    let pad = if options.has_padding {
        maybe_swap(rdr.read_i32::<NativeEndian>()?, swap)
    } else {
        0
    };

    Ok(Header { time, nbodies, ndim, nsph, ndark, nstar, pad })
}

/// Write a header in the byte order and layout given by `options`.
pub fn write_header<W: Write>(w: &mut W, header: &Header, options: CodecOptions) -> std::io::Result<()> {
    let swap = options.swap_endian;
    w.write_f64::<NativeEndian>(maybe_swap(header.time, swap))?;
    for value in [header.nbodies, header.ndim, header.nsph, header.ndark, header.nstar] {
        w.write_i32::<NativeEndian>(maybe_swap(value, swap))?;
    }
    if options.has_padding {
        w.write_i32::<NativeEndian>(maybe_swap(header.pad, swap))?;
    }
    Ok(())
}

/// Encode a header into a new buffer.
pub fn encode_header(header: &Header, options: CodecOptions) -> Vec<u8> {
    let swap = options.swap_endian;
    let mut buf = Vec::with_capacity(header_size(options.has_padding));
    buf.extend_from_slice(&maybe_swap(header.time, swap).to_ne_bytes());
    for value in [header.nbodies, header.ndim, header.nsph, header.ndark, header.nstar] {
        buf.extend_from_slice(&maybe_swap(value, swap).to_ne_bytes());
    }
    if options.has_padding {
        buf.extend_from_slice(&maybe_swap(header.pad, swap).to_ne_bytes());
    }
    buf
}

/// Decode `count` records of kind `P` from the start of `bytes`.
///
/// Fails with [`Error::Truncated`] before allocating if `bytes` is too short.
pub fn decode_particles<P: Particle>(bytes: &[u8], count: usize, swap: bool) -> Result<Vec<P>> {
    let needed = records_size(P::KIND, count)?;
    if bytes.len() < needed {
        return Err(Error::truncated(
            format!("{} particles", P::KIND),
            needed,
            bytes.len(),
        ));
    }

    let mut records = vec![P::zeroed(); count];
    bytemuck::cast_slice_mut::<P, u8>(&mut records).copy_from_slice(&bytes[..needed]);
    if swap {
        swap_words(bytemuck::cast_slice_mut::<P, u32>(&mut records));
    }
    Ok(records)
}

/// Encode records of kind `P` as raw words in the requested byte order.
pub fn encode_particles<P: Particle>(records: &[P], swap: bool) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice::<P, u8>(records).to_vec();
    if swap {
        for word in bytes.chunks_exact_mut(4) {
            swap_in_place(word);
        }
    }
    bytes
}

/// Byte size of `count` records of the given kind.
pub fn records_size(kind: ParticleKind, count: usize) -> Result<usize> {
    count
        .checked_mul(kind.record_size())
        .ok_or_else(|| Error::invalid_arg(format!("{} {} particles overflow the address space", count, kind)))
}

/// Byte sizes of the gas, dark and star sections described by `header`.
///
/// Fails with [`Error::InvalidHeader`] on negative counts or when the
/// sections together overflow the address space.
pub fn section_sizes(header: &Header) -> Result<(usize, usize, usize)> {
    let (nsph, ndark, nstar) = header.particle_counts()?;
    let gas = nsph.checked_mul(ParticleKind::Gas.record_size());
    let dark = ndark.checked_mul(ParticleKind::Dark.record_size());
    let star = nstar.checked_mul(ParticleKind::Star.record_size());
    match (gas, dark, star) {
        (Some(gas), Some(dark), Some(star))
            if gas.checked_add(dark).and_then(|n| n.checked_add(star)).is_some() =>
        {
            Ok((gas, dark, star))
        }
        _ => Err(Error::InvalidHeader {
            context: "header".into(),
            reason: format!(
                "particle counts ({}, {}, {}) overflow the address space",
                nsph, ndark, nstar
            ),
        }),
    }
}

/// Byte size of the particle section described by `header`.
pub fn payload_size(header: &Header) -> Result<usize> {
    let (gas, dark, star) = section_sizes(header)?;
    Ok(gas + dark + star)
}
