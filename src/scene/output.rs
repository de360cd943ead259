//! Scene file output.
//!
//! The text format is one header row followed by one
//! `lower upper fraction` line per frame.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::generator::Interpolation;
use crate::util::{Error, Result};

/// Header row of a scene file.
pub const SCENE_HEADER: &str = "snapshot_base1 snapshot_base2 fidx";

/// Default scene file name.
pub const DEFAULT_SCENE_FILE: &str = "output.scene";

/// Write frames as whitespace-separated text.
pub fn write_scene<W: Write>(w: &mut W, frames: &[Interpolation]) -> std::io::Result<()> {
    writeln!(w, "{}", SCENE_HEADER)?;
    for f in frames {
        writeln!(w, "{} {} {}", f.lower, f.upper, f.fraction)?;
    }
    Ok(())
}

/// Write frames as a JSON array of `{lower, upper, fraction}` objects.
pub fn write_scene_json<W: Write>(w: &mut W, frames: &[Interpolation]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, frames)?;
    writeln!(w)?;
    Ok(())
}

/// Create `path` and write the scene to it, as text or JSON.
pub fn write_scene_file(path: impl AsRef<Path>, frames: &[Interpolation], json: bool) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source| Error::Write { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    if json {
        write_scene_json(&mut out, frames).map_err(|e| match e {
            Error::Io(source) => write_err(source),
            other => other,
        })?;
    } else {
        write_scene(&mut out, frames).map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;
    Ok(())
}
