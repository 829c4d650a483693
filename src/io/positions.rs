//! Particle position files
//!
//! Format: the particle count, an opening bracket line, one `(x y z)` line per
//! particle with 15 decimals, and a closing bracket.
//!
//! ```text
//! 2
//! (
//! (0.000000000000000 0.000000000000000 0.100000000000000)
//! (0.000100000000000 0.000000000000000 0.250000000000000)
//! )
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::FileError;
use crate::simulation::states::{NVec3, Snapshot, SnapshotWriter};

const FILE_PREFIX: &str = "pos";
const LEGACY_FILE_PREFIX: &str = "particlePositions";
const TIME_TAG: &str = "_t";
const FILE_SUFFIX: &str = ".out";

pub fn read_positions(path: impl AsRef<Path>) -> Result<Vec<NVec3>, FileError> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_positions(&text)
}

pub fn parse_positions(text: &str) -> Result<Vec<NVec3>, FileError> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let declared = match lines.next() {
        Some((i, l)) => l.trim().parse::<usize>().map_err(|_| FileError::Parse {
            line: i + 1,
            reason: format!("expected the particle count, found \"{}\"", l.trim()),
        })?,
        None => return Err(FileError::Parse { line: 1, reason: "empty file".to_string() }),
    };

    let mut positions = Vec::with_capacity(declared);
    for (i, raw) in lines {
        let line = raw.replace(['(', ')'], " ");
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue; // bracket lines
        }
        if fields.len() != 3 {
            return Err(FileError::Parse {
                line: i + 1,
                reason: format!("expected (x y z), found {} values", fields.len()),
            });
        }
        let mut xyz = [0.0; 3];
        for (slot, field) in xyz.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| FileError::Parse {
                line: i + 1,
                reason: format!("\"{field}\" is not a number"),
            })?;
        }
        positions.push(NVec3::from(xyz));
    }

    if positions.len() != declared {
        return Err(FileError::CountMismatch { declared, found: positions.len() });
    }
    Ok(positions)
}

pub fn write_positions<W: Write>(out: &mut W, positions: &[NVec3]) -> io::Result<()> {
    writeln!(out, "{}", positions.len())?;
    writeln!(out, "(")?;
    for p in positions {
        writeln!(out, "({:.15} {:.15} {:.15})", p.x, p.y, p.z)?;
    }
    writeln!(out, ")")?;
    Ok(())
}

/// `pos_t<time>`, with the time rounded to 9 significant digits
pub fn positions_file_name(time: f64) -> String {
    let rounded: f64 = format!("{time:.8e}").parse().unwrap_or(time);
    format!("{FILE_PREFIX}{TIME_TAG}{rounded}")
}

/// Recover the time from a name like `pos_t0.25`, `pos_t3_0.25` or
/// `particlePositions_t1e-06.out`
pub fn time_from_file_name(path: impl AsRef<Path>) -> Option<f64> {
    let name = path.as_ref().file_name()?.to_str()?;
    let name = name.strip_suffix(FILE_SUFFIX).unwrap_or(name);
    let tail = name
        .strip_prefix(LEGACY_FILE_PREFIX)
        .or_else(|| name.strip_prefix(FILE_PREFIX))?
        .strip_prefix(TIME_TAG)?;

    // optional integer index: "<index>_<time>"
    let time = match tail.split_once('_') {
        Some((index, time)) if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) => time,
        _ => tail,
    };
    time.parse().ok()
}

/// Writes every snapshot as its own file in an output directory
#[derive(Debug)]
pub struct DirectoryWriter {
    dir: PathBuf,
    overwrite: bool,
    written: usize,
}

impl DirectoryWriter {
    /// Prepare `dir`. An existing directory is refused unless `overwrite` is
    /// set or it is the working directory `.`.
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> io::Result<Self> {
        let dir = dir.into();
        if dir.exists() && !overwrite && dir != Path::new(".") {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("output directory {} already exists and overwrite is off", dir.display()),
            ));
        }
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, overwrite, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl SnapshotWriter for DirectoryWriter {
    fn write(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let path = self.dir.join(positions_file_name(snapshot.time));
        if path.exists() && !self.overwrite {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("output file {} already exists and overwrite is off", path.display()),
            ));
        }
        let mut out = BufWriter::new(File::create(&path)?);
        write_positions(&mut out, snapshot.positions)?;
        out.flush()?;
        self.written += 1;
        debug!("wrote {}", path.display());
        Ok(())
    }
}
