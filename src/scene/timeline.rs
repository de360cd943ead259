//! Ordered snapshot times and bracketing queries.

use serde::Serialize;

use crate::util::{Error, Result};

/// A snapshot identifier with its simulation time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub time: f64,
}

impl SnapshotEntry {
    pub fn new(id: impl Into<String>, time: f64) -> Self {
        Self { id: id.into(), time }
    }
}

/// Snapshots in caller order, with non-decreasing times.
///
/// The input is never reordered: a timeline whose times go backwards is
/// rejected instead.
#[derive(Clone, Debug)]
pub struct Timeline {
    entries: Vec<SnapshotEntry>,
}

impl Timeline {
    /// Build a timeline from `(id, time)` pairs.
    ///
    /// Fails with [`Error::InvalidArgument`] if empty or if a time is
    /// infinite, and with [`Error::Unsorted`] at the first adjacent pair whose
    /// time decreases.
    pub fn build<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(id, time)| SnapshotEntry::new(id, time))
            .collect();
        Self::from_entries(entries)
    }

    /// Build a timeline from already-constructed entries.
    pub fn from_entries(entries: Vec<SnapshotEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::invalid_arg("timeline needs at least one snapshot"));
        }

        for (i, pair) in entries.windows(2).enumerate() {
            // NaN fails this comparison too
            if !(pair[0].time <= pair[1].time) {
                return Err(Error::Unsorted {
                    index: i,
                    next: i + 1,
                    time: pair[0].time,
                    next_time: pair[1].time,
                });
            }
        }

        if let Some((i, entry)) = entries.iter().enumerate().find(|(_, e)| !e.time.is_finite()) {
            return Err(Error::invalid_arg(format!(
                "snapshot {} ({}) has non-finite time {}",
                i, entry.id, entry.time
            )));
        }

        Ok(Self { entries })
    }

    /// Number of snapshots (never zero).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; an empty timeline cannot be built.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SnapshotEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapshotEntry> + '_ {
        self.entries.iter()
    }

    #[inline]
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Earliest snapshot time.
    #[inline]
    pub fn min_time(&self) -> f64 {
        self.entries[0].time
    }

    /// Latest snapshot time.
    #[inline]
    pub fn max_time(&self) -> f64 {
        self.entries[self.entries.len() - 1].time
    }

    /// Index of the last snapshot before the first time greater than `t`.
    ///
    /// Scans forward from the start. Clamps to the last snapshot when no
    /// time exceeds `t`, and to the first when `t` precedes everything.
    pub fn lower_index(&self, t: f64) -> usize {
        let last = self.entries.len() - 1;
        let mut idx = 0;
        while idx < last {
            if self.entries[idx + 1].time > t {
                break;
            }
            idx += 1;
        }
        idx
    }

    /// Index of the first snapshot after the last time less than or equal to `t`.
    ///
    /// Scans backward from the end. Clamps to the first snapshot when no
    /// time is `<= t`, and to the last when `t` follows everything.
    pub fn upper_index(&self, t: f64) -> usize {
        let mut idx = self.entries.len() - 1;
        while idx > 0 {
            if self.entries[idx - 1].time <= t {
                break;
            }
            idx -= 1;
        }
        idx
    }

    /// Id of the snapshot at [`lower_index`](Self::lower_index).
    pub fn lower_bracket(&self, t: f64) -> &str {
        &self.entries[self.lower_index(t)].id
    }

    /// Id of the snapshot at [`upper_index`](Self::upper_index).
    pub fn upper_bracket(&self, t: f64) -> &str {
        &self.entries[self.upper_index(t)].id
    }

    /// Time of the first snapshot with the given id.
    pub fn time_of(&self, id: &str) -> Result<f64> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.time)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}
