//! Parallel header loading.
//!
//! Each input file gets its own [`SnapshotFile`] on a rayon worker. Only the
//! headers are read. The collect is the barrier: the timeline is validated
//! once every header is in.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info};

use super::timeline::{SnapshotEntry, Timeline};
use crate::tipsy::{CodecOptions, Header, SnapshotFile};
use crate::util::Result;

/// An input snapshot: identifier plus the file it is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotSource {
    pub id: String,
    pub path: PathBuf,
}

impl SnapshotSource {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Read one header with buffered I/O and release the file.
pub fn read_header(source: &SnapshotSource, options: CodecOptions) -> Result<Header> {
    let mut snap = SnapshotFile::open_opts(&source.path, options, false)?;
    let header = snap.read_header()?;
    snap.close();
    debug!(id = %source.id, path = %source.path.display(), %header, "snapshot header");
    Ok(header)
}

/// Read every header in parallel and return entries in input order.
///
/// On failure, the error of the first failing input (in input order) is
/// returned.
pub fn read_entries(sources: &[SnapshotSource], options: CodecOptions) -> Result<Vec<SnapshotEntry>> {
    let results: Vec<Result<SnapshotEntry>> = sources
        .par_iter()
        .map(|source| {
            read_header(source, options).map(|h| SnapshotEntry::new(source.id.clone(), h.time))
        })
        .collect();

    results.into_iter().collect()
}

/// Read every header and build the timeline from the results.
pub fn load_timeline(sources: &[SnapshotSource], options: CodecOptions) -> Result<Timeline> {
    let entries = read_entries(sources, options)?;
    let timeline = Timeline::from_entries(entries)?;
    info!(
        snapshots = timeline.len(),
        tmin = timeline.min_time(),
        tmax = timeline.max_time(),
        "loaded timeline"
    );
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tipsy::{write_snapshot, ParticleSet};
    use crate::util::Error;
    use tempfile::TempDir;

    fn write_header_only(dir: &TempDir, name: &str, time: f64) -> PathBuf {
        let path = dir.path().join(name);
        let set = ParticleSet::default();
        write_snapshot(&path, &set.header(time).unwrap(), &set, CodecOptions::new()).unwrap();
        path
    }

    #[test]
    fn test_load_in_order() {
        let dir = TempDir::new().unwrap();
        let sources: Vec<_> = (0..8)
            .map(|i| {
                let id = format!("{:05}", i * 10);
                let path = write_header_only(&dir, &format!("run.{}", id), i as f64 * 0.5);
                SnapshotSource::new(id, path)
            })
            .collect();

        let tl = load_timeline(&sources, CodecOptions::new()).unwrap();
        assert_eq!(tl.len(), 8);
        let ids: Vec<_> = tl.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids[0], "00000");
        assert_eq!(ids[7], "00070");
        assert_eq!(tl.max_time(), 3.5);
    }

    #[test]
    fn test_first_error_reported() {
        let dir = TempDir::new().unwrap();
        let good = write_header_only(&dir, "run.00001", 0.0);
        let sources = vec![
            SnapshotSource::new("00001", good),
            SnapshotSource::new("missing-a", dir.path().join("run.missing-a")),
            SnapshotSource::new("missing-b", dir.path().join("run.missing-b")),
        ];
        match read_entries(&sources, CodecOptions::new()) {
            Err(Error::Open { path, .. }) => assert!(path.ends_with("run.missing-a")),
            other => panic!("expected open error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_header_names_file() {
        let dir = TempDir::new().unwrap();
        let subdir = dir.path().join("run.00002");
        std::fs::create_dir(&subdir).unwrap();
        let sources = vec![
            SnapshotSource::new("00001", write_header_only(&dir, "run.00001", 0.0)),
            SnapshotSource::new("00002", subdir.clone()),
        ];
        let err = read_entries(&sources, CodecOptions::new()).unwrap_err();
        assert!(err.to_string().contains("run.00002"), "got {}", err);
    }

    #[test]
    fn test_unsorted_files() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            SnapshotSource::new("1", write_header_only(&dir, "s.1", 2.0)),
            SnapshotSource::new("2", write_header_only(&dir, "s.2", 1.0)),
        ];
        assert!(matches!(
            load_timeline(&sources, CodecOptions::new()),
            Err(Error::Unsorted { index: 0, next: 1, .. })
        ));
    }
}
