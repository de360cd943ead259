//! Snapshot file reader/writer.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, trace};

use super::codec::{decode_header, decode_particles, encode_particles, section_sizes, write_header};
use super::format::CodecOptions;
use super::records::{DarkParticle, GasParticle, Header, ParticleSet, StarParticle};
use crate::util::{Error, Result};

/// Readable byte source behind a snapshot.
enum Source {
    /// Memory-mapped file (preferred for full reads)
    Mmap(Mmap),
    /// Buffered file access (fallback, and for header-only reads)
    File(BufReader<File>),
}

impl Source {
    /// Read up to `len` bytes at `pos`. Returns fewer bytes at end of file.
    fn read_at(&mut self, pos: u64, len: usize) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            Source::Mmap(mmap) => {
                let start = (pos as usize).min(mmap.len());
                let end = start.saturating_add(len).min(mmap.len());
                Ok(Cow::Borrowed(&mmap[start..end]))
            }
            Source::File(reader) => {
                reader.seek(SeekFrom::Start(pos))?;
                let mut buf = Vec::with_capacity(len);
                reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }
}

/// One tipsy snapshot on disk.
///
/// The header is read lazily and cached. Particle arrays are read once by
/// [`read_all`](Self::read_all), which releases the file afterwards; the
/// decoded arrays stay owned by this value.
pub struct SnapshotFile {
    path: PathBuf,
    options: CodecOptions,
    source: Option<Source>,
    size: u64,
    header: Option<Header>,
    particles: Option<ParticleSet>,
}

impl SnapshotFile {
    /// Open a snapshot with the default layout (padded header, swapped byte order).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, CodecOptions::default(), true)
    }

    /// Open a snapshot with an explicit layout and optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, options: CodecOptions, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| Error::Open { path: path.clone(), source };

        let file = File::open(&path).map_err(open_err)?;
        let size = file.metadata().map_err(open_err)?.len();

        let source = if use_mmap && size > 0 {
            // Safety: mapped read-only; the file is not modified while mapped.
            let mmap = unsafe { Mmap::map(&file) }.map_err(open_err)?;
            Source::Mmap(mmap)
        } else {
            Source::File(BufReader::new(file))
        };

        debug!(path = %path.display(), size, ?options, use_mmap, "opened snapshot");

        Ok(Self {
            path,
            options,
            source: Some(source),
            size,
            header: None,
            particles: None,
        })
    }

    /// Path this snapshot was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Layout used for reading (and, by default, writing).
    #[inline]
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Size of the file in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check whether the underlying file is still held.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Cached header, if it has been read.
    #[inline]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Decoded particle arrays, if [`read_all`](Self::read_all) has run.
    #[inline]
    pub fn particles(&self) -> Option<&ParticleSet> {
        self.particles.as_ref()
    }

    /// Take ownership of the decoded particle arrays.
    pub fn into_particles(self) -> Option<ParticleSet> {
        self.particles
    }

    /// Read and cache the header. Later calls return the cached value.
    pub fn read_header(&mut self) -> Result<Header> {
        if let Some(header) = self.header {
            return Ok(header);
        }

        let source = self
            .source
            .as_mut()
            .ok_or_else(|| Error::SourceClosed(self.path.clone()))?;

        let len = self.options.header_size();
        let bytes = source
            .read_at(0, len)
            .map_err(|source| Error::Read { path: self.path.clone(), source })?;
        let header = decode_header(&bytes, self.options).map_err(|e| e.in_file(&self.path))?;

        trace!(path = %self.path.display(), %header, "read header");
        self.header = Some(header);
        Ok(header)
    }

    /// Read the header (if needed) and all particle arrays, then release the file.
    ///
    /// This is a single pass: a second call fails with [`Error::SourceClosed`].
    pub fn read_all(&mut self) -> Result<&ParticleSet> {
        if self.source.is_none() {
            return Err(Error::SourceClosed(self.path.clone()));
        }

        let header = self.read_header()?;
        let (nsph, ndark, nstar) = header.particle_counts().map_err(|e| e.in_file(&self.path))?;

        let (gas_len, dark_len, star_len) = section_sizes(&header).map_err(|e| e.in_file(&self.path))?;
        let needed = gas_len + dark_len + star_len;

        let offset = self.options.header_size() as u64;
        let available = self.size.saturating_sub(offset);
        if available < needed as u64 {
            return Err(Error::truncated(
                "particle section",
                needed,
                usize::try_from(available).unwrap_or(usize::MAX),
            )
            .in_file(&self.path));
        }

        let swap = self.options.swap_endian;
        let particles = {
            let source = self
                .source
                .as_mut()
                .ok_or_else(|| Error::SourceClosed(self.path.clone()))?;
            let bytes = source
                .read_at(offset, needed)
                .map_err(|source| Error::Read { path: self.path.clone(), source })?;
            let (gas_bytes, rest) = bytes.split_at(gas_len.min(bytes.len()));
            let (dark_bytes, star_bytes) = rest.split_at(dark_len.min(rest.len()));

            let in_file = |e: Error| e.in_file(&self.path);
            ParticleSet {
                gas: decode_particles::<GasParticle>(gas_bytes, nsph, swap).map_err(in_file)?,
                dark: decode_particles::<DarkParticle>(dark_bytes, ndark, swap).map_err(in_file)?,
                star: decode_particles::<StarParticle>(star_bytes, nstar, swap).map_err(in_file)?,
            }
        };

        debug!(
            path = %self.path.display(),
            nbodies = header.nbodies,
            nsph,
            ndark,
            nstar,
            swapped = swap,
            "read snapshot"
        );

        self.source = None;
        Ok(&*self.particles.insert(particles))
    }

    /// Release the underlying file. Cached header and particles are kept.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            trace!(path = %self.path.display(), "closed snapshot");
        }
    }

    /// Write header and particles to `path` in this snapshot's byte order.
    pub fn write(&self, path: impl AsRef<Path>, has_padding: bool) -> Result<()> {
        self.write_opts(path, self.options.with_padding(has_padding))
    }

    /// Write header and particles to `path` with an explicit layout.
    ///
    /// The header is re-encoded for `options`, so the on-disk time and counts
    /// always match the byte order of the particle words that follow.
    pub fn write_opts(&self, path: impl AsRef<Path>, options: CodecOptions) -> Result<()> {
        let header = self.header.ok_or_else(|| {
            Error::invalid_arg(format!("{}: header has not been read", self.path.display()))
        })?;
        match &self.particles {
            Some(particles) => write_snapshot(path, &header, particles, options),
            None if header.particle_counts()? == (0, 0, 0) => {
                write_snapshot(path, &header, &ParticleSet::default(), options)
            }
            None => Err(Error::invalid_arg(format!(
                "{}: particles have not been read",
                self.path.display()
            ))),
        }
    }
}

/// Write a snapshot to a new file.
///
/// The particle array lengths must match the header counts.
pub fn write_snapshot(
    path: impl AsRef<Path>,
    header: &Header,
    particles: &ParticleSet,
    options: CodecOptions,
) -> Result<()> {
    let path = path.as_ref();
    if !particles.matches(header) {
        return Err(Error::invalid_arg(format!(
            "{}: header counts ({}, {}, {}) do not match particle arrays ({}, {}, {})",
            path.display(),
            header.nsph,
            header.ndark,
            header.nstar,
            particles.gas.len(),
            particles.dark.len(),
            particles.star.len()
        )));
    }

    let write_err = |source| Error::Write { path: path.to_path_buf(), source };

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;
    let mut out = BufWriter::new(file);

    let swap = options.swap_endian;
    write_header(&mut out, header, options).map_err(write_err)?;
    out.write_all(&encode_particles(&particles.gas, swap)).map_err(write_err)?;
    out.write_all(&encode_particles(&particles.dark, swap)).map_err(write_err)?;
    out.write_all(&encode_particles(&particles.star, swap)).map_err(write_err)?;
    out.flush().map_err(write_err)?;

    debug!(path = %path.display(), particles = particles.len(), ?options, "wrote snapshot");
    Ok(())
}
