//! Frame interpolation list generation.

use serde::Serialize;
use tracing::{debug, trace};

use super::timeline::Timeline;
use crate::util::{Error, Result};

/// One output frame: blend `fraction` of the way from `lower` to `upper`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Interpolation {
    pub lower: String,
    pub upper: String,
    pub fraction: f64,
}

impl Interpolation {
    pub fn new(lower: impl Into<String>, upper: impl Into<String>, fraction: f64) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            fraction,
        }
    }
}

/// Scene generation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Number of frame intervals between the first and last snapshot time.
    pub frame_count: usize,
    /// Log every generated frame at trace level.
    pub trace_frames: bool,
}

impl SceneConfig {
    pub fn new(frame_count: usize) -> Self {
        Self { frame_count, trace_frames: false }
    }

    pub fn with_trace_frames(mut self, trace_frames: bool) -> Self {
        self.trace_frames = trace_frames;
        self
    }
}

/// Maps an evenly spaced grid of frame times onto bracketing snapshots.
#[derive(Clone, Debug)]
pub struct SceneGenerator {
    config: SceneConfig,
}

impl SceneGenerator {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Produce `frame_count + 1` interpolations covering `[tmin, tmax]` inclusive.
    ///
    /// Frame `i` sits at `tmin + i * (tmax - tmin) / frame_count`; the last
    /// frame is pinned to `tmax` so rounding never drops it. Spans too wide
    /// for an f64 are blended from the endpoints instead.
    pub fn generate(&self, timeline: &Timeline) -> Result<Vec<Interpolation>> {
        let frames = self.config.frame_count;
        if frames == 0 {
            return Err(Error::invalid_arg("frame count must be positive"));
        }

        let tmin = timeline.min_time();
        let tmax = timeline.max_time();
        let span = tmax - tmin;
        let step = span / frames as f64;
        debug!(tmin, tmax, step, frames, snapshots = timeline.len(), "generating scene");

        let mut out = Vec::with_capacity(frames + 1);
        for i in 0..=frames {
            let t = if i == frames {
                tmax
            } else if span.is_finite() {
                (tmin + i as f64 * step).min(tmax)
            } else {
                let u = i as f64 / frames as f64;
                (tmin * (1.0 - u) + tmax * u).clamp(tmin, tmax)
            };
            let frame = interpolate(timeline, t);
            if self.config.trace_frames {
                trace!(frame = i, t, lower = %frame.lower, upper = %frame.upper, fraction = frame.fraction);
            }
            out.push(frame);
        }

        Ok(out)
    }
}

/// Generate a scene with default settings.
pub fn generate(timeline: &Timeline, frame_count: usize) -> Result<Vec<Interpolation>> {
    SceneGenerator::new(SceneConfig::new(frame_count)).generate(timeline)
}

/// Bracket `t` and compute its blend fraction.
///
/// At the end of the range both scans land on the last snapshot; the pair
/// then steps back to (second to last, last) so the final frame is a full
/// blend into the last snapshot. A degenerate pair (same snapshot or equal
/// times) gets fraction 0. The result is clamped to `[0, 1]`.
pub fn interpolate(timeline: &Timeline, t: f64) -> Interpolation {
    let mut lo = timeline.lower_index(t);
    let hi = timeline.upper_index(t);
    let last = timeline.len() - 1;
    if lo == hi && hi == last && last > 0 {
        lo = last - 1;
    }

    let entries = timeline.entries();
    let (lower, upper) = (&entries[lo], &entries[hi]);
    let span = upper.time - lower.time;
    let fraction = if lo == hi || span == 0.0 {
        0.0
    } else if span.is_finite() {
        (t - lower.time) / span
    } else {
        // halved operands keep both differences finite
        (t / 2.0 - lower.time / 2.0) / (upper.time / 2.0 - lower.time / 2.0)
    };
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };

    Interpolation::new(lower.id.as_str(), upper.id.as_str(), fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(f: &Interpolation) -> (&str, &str, f64) {
        (f.lower.as_str(), f.upper.as_str(), f.fraction)
    }

    #[test]
    fn test_uniform_knots() {
        let tl = Timeline::build([("a", 0.0), ("b", 1.0), ("c", 2.0), ("d", 3.0)]).unwrap();
        let frames = generate(&tl, 3).unwrap();
        let got: Vec<_> = frames.iter().map(triple).collect();
        assert_eq!(
            got,
            vec![("a", "b", 0.0), ("b", "c", 0.0), ("c", "d", 0.0), ("c", "d", 1.0)]
        );
    }

    #[test]
    fn test_midpoint_fraction() {
        let tl = Timeline::build([("a", 0.0), ("b", 2.0)]).unwrap();
        let frames = generate(&tl, 2).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(triple(&frames[1]), ("a", "b", 0.5));
        assert_eq!(triple(&frames[2]), ("a", "b", 1.0));
    }

    #[test]
    fn test_single_snapshot_zero_fraction() {
        let tl = Timeline::build([("only", 5.0)]).unwrap();
        let f = interpolate(&tl, 5.0);
        assert_eq!(triple(&f), ("only", "only", 0.0));

        let frames = generate(&tl, 4).unwrap();
        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|f| f.fraction == 0.0 && !f.fraction.is_nan()));
    }

    #[test]
    fn test_zero_frames_rejected() {
        let tl = Timeline::build([("a", 0.0), ("b", 1.0)]).unwrap();
        assert!(matches!(generate(&tl, 0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_frame_count_plus_one() {
        let tl = Timeline::build([("a", 0.0), ("b", 0.3), ("c", 1.1), ("d", 1.7)]).unwrap();
        for n in [1usize, 7, 10, 100, 333] {
            let frames = generate(&tl, n).unwrap();
            assert_eq!(frames.len(), n + 1);
            let last = frames.last().unwrap();
            assert_eq!(triple(last), ("c", "d", 1.0));
        }
    }

    #[test]
    fn test_fractions_in_range_and_monotone_pairs() {
        let tl = Timeline::build([("a", 0.0), ("b", 0.25), ("c", 0.5), ("d", 2.0)]).unwrap();
        let frames = generate(&tl, 50).unwrap();
        for f in &frames {
            assert!((0.0..=1.0).contains(&f.fraction), "fraction {} out of range", f.fraction);
        }
        let order = |id: &str| tl.iter().position(|e| e.id == id).unwrap();
        for w in frames.windows(2) {
            assert!(order(w[0].lower.as_str()) <= order(w[1].lower.as_str()));
        }
    }

    #[test]
    fn test_duplicate_times_no_nan() {
        let tl = Timeline::build([("a", 0.0), ("b", 1.0), ("c", 1.0)]).unwrap();
        let frames = generate(&tl, 2).unwrap();
        assert!(frames.iter().all(|f| !f.fraction.is_nan()));
        let f = interpolate(&tl, 1.0);
        assert_eq!(f.fraction, 0.0);
    }

    #[test]
    fn test_span_wider_than_f64() {
        let tl = Timeline::build([("a", -1e308), ("b", 1e308)]).unwrap();
        let frames = generate(&tl, 4).unwrap();
        assert_eq!(frames.len(), 5);
        let expected = [0.0, 0.25, 0.5, 0.75, 1.0];
        for (f, want) in frames.iter().zip(expected) {
            assert!(!f.fraction.is_nan());
            assert!((0.0..=1.0).contains(&f.fraction), "fraction {} out of range", f.fraction);
            assert!((f.fraction - want).abs() < 1e-12, "fraction {} != {}", f.fraction, want);
        }
        assert_eq!(triple(&frames[0]), ("a", "b", 0.0));
        assert_eq!(triple(&frames[4]), ("a", "b", 1.0));
    }

    #[test]
    fn test_wide_span_interpolate() {
        let tl = Timeline::build([("a", -f64::MAX), ("b", 0.0), ("c", f64::MAX)]).unwrap();
        let f = interpolate(&tl, f64::MAX / 2.0);
        assert_eq!((f.lower.as_str(), f.upper.as_str()), ("b", "c"));
        assert!((f.fraction - 0.5).abs() < 1e-12);

        let frames = generate(&tl, 8).unwrap();
        assert!(frames.iter().all(|f| (0.0..=1.0).contains(&f.fraction)));
    }

    #[test]
    fn test_trace_frames_config() {
        let config = SceneConfig::new(2).with_trace_frames(true);
        let generator = SceneGenerator::new(config);
        assert!(generator.config().trace_frames);
        let tl = Timeline::build([("a", 0.0), ("b", 2.0)]).unwrap();
        assert_eq!(generator.generate(&tl).unwrap().len(), 3);
    }
}
