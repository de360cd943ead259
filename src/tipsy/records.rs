//! Header and particle record types.
//!
//! Particle records are `#[repr(C)]` and made entirely of f32 words, so an
//! array of records can be viewed as raw bytes or as a flat `[u32]` without
//! copying.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::format::WORD_SIZE;
use crate::util::{Error, Result};

/// Snapshot file header.
///
/// Values are always held in host byte order; the on-disk order is decided
/// by [`CodecOptions`](super::CodecOptions) at encode/decode time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Header {
    /// Simulation time of the snapshot.
    pub time: f64,
    /// Total number of bodies (expected to be nsph + ndark + nstar, not enforced).
    pub nbodies: i32,
    /// Dimensionality.
    pub ndim: i32,
    /// Number of gas particles.
    pub nsph: i32,
    /// Number of dark matter particles.
    pub ndark: i32,
    /// Number of star particles.
    pub nstar: i32,
    /// Trailing pad word, only present on disk for padded layouts.
    pub pad: i32,
}

impl Header {
    /// Create a 3D header with `nbodies` set to the sum of the counts.
    ///
    /// A sum beyond `i32::MAX` saturates; [`counts_consistent`](Self::counts_consistent)
    /// then reports the mismatch.
    pub fn new(time: f64, nsph: i32, ndark: i32, nstar: i32) -> Self {
        let total = i64::from(nsph) + i64::from(ndark) + i64::from(nstar);
        Self {
            time,
            nbodies: i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX }),
            ndim: 3,
            nsph,
            ndark,
            nstar,
            pad: 0,
        }
    }

    /// Check `nbodies == nsph + ndark + nstar`.
    pub fn counts_consistent(&self) -> bool {
        i64::from(self.nsph) + i64::from(self.ndark) + i64::from(self.nstar)
            == i64::from(self.nbodies)
    }

    /// Gas, dark and star counts as sizes.
    ///
    /// Fails with [`Error::InvalidHeader`] if any count is negative.
    pub fn particle_counts(&self) -> Result<(usize, usize, usize)> {
        let count = |kind: ParticleKind, n: i32| {
            usize::try_from(n).map_err(|_| Error::InvalidHeader {
                context: "header".into(),
                reason: format!("negative {} count {}", kind, n),
            })
        };
        Ok((
            count(ParticleKind::Gas, self.nsph)?,
            count(ParticleKind::Dark, self.ndark)?,
            count(ParticleKind::Star, self.nstar)?,
        ))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time: {} nbodies: {} ndim: {} ngas: {} ndark: {} nstar: {}",
            self.time, self.nbodies, self.ndim, self.nsph, self.ndark, self.nstar
        )
    }
}

/// The three particle record variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Gas,
    Dark,
    Star,
}

impl ParticleKind {
    /// Number of 4-byte words per record.
    #[inline]
    pub const fn words(self) -> usize {
        match self {
            Self::Gas => 12,
            Self::Dark => 9,
            Self::Star => 11,
        }
    }

    /// Record size in bytes.
    #[inline]
    pub const fn record_size(self) -> usize {
        self.words() * WORD_SIZE
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gas => "gas",
            Self::Dark => "dark",
            Self::Star => "star",
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-size particle record that can be cast to and from raw words.
pub trait Particle: Pod + Default + fmt::Debug {
    const KIND: ParticleKind;
}

/// Gas (SPH) particle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GasParticle {
    pub mass: f32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub rho: f32,
    pub temp: f32,
    pub hsmooth: f32,
    pub metals: f32,
    pub phi: f32,
}

/// Dark matter particle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DarkParticle {
    pub mass: f32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub eps: f32,
    pub phi: f32,
}

/// Star particle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct StarParticle {
    pub mass: f32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub metals: f32,
    pub tform: f32,
    pub eps: f32,
    pub phi: f32,
}

impl Particle for GasParticle {
    const KIND: ParticleKind = ParticleKind::Gas;
}

impl Particle for DarkParticle {
    const KIND: ParticleKind = ParticleKind::Dark;
}

impl Particle for StarParticle {
    const KIND: ParticleKind = ParticleKind::Star;
}

const _: () = assert!(std::mem::size_of::<GasParticle>() == ParticleKind::Gas.record_size());
const _: () = assert!(std::mem::size_of::<DarkParticle>() == ParticleKind::Dark.record_size());
const _: () = assert!(std::mem::size_of::<StarParticle>() == ParticleKind::Star.record_size());

/// Owned particle arrays of one snapshot, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSet {
    pub gas: Vec<GasParticle>,
    pub dark: Vec<DarkParticle>,
    pub star: Vec<StarParticle>,
}

impl ParticleSet {
    /// Total number of particles across all kinds.
    pub fn len(&self) -> usize {
        self.gas.len() + self.dark.len() + self.star.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the array lengths match the header counts.
    pub fn matches(&self, header: &Header) -> bool {
        match header.particle_counts() {
            Ok((nsph, ndark, nstar)) => {
                self.gas.len() == nsph && self.dark.len() == ndark && self.star.len() == nstar
            }
            Err(_) => false,
        }
    }

    /// Build a header describing these arrays at the given time.
    pub fn header(&self, time: f64) -> Result<Header> {
        let count = |kind: ParticleKind, n: usize| {
            i32::try_from(n).map_err(|_| Error::invalid_arg(format!("too many {} particles: {}", kind, n)))
        };
        let header = Header::new(
            time,
            count(ParticleKind::Gas, self.gas.len())?,
            count(ParticleKind::Dark, self.dark.len())?,
            count(ParticleKind::Star, self.star.len())?,
        );
        if !header.counts_consistent() {
            return Err(Error::invalid_arg(format!("too many particles: {}", self.len())));
        }
        Ok(header)
    }
}
