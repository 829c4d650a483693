//! Core state types for the advection engine.
//!
//! Defines the vector alias used everywhere, the snapshot handed to writers
//! and the writer trait itself:
//! - `NVec3` for positions, orientations and velocity weights
//! - `Snapshot` / `OwnedSnapshot` for particle positions tagged with a time
//! - `SnapshotWriter` for whatever consumes snapshots during a run

use std::io;

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

/// Borrowed view of the particle set at one simulation time.
///
/// The borrow ends before the advector mutates its buffer again, so a writer
/// that needs to keep the data must copy it (see [`Snapshot::to_owned`]).
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub time: f64, // simulation time of this sample
    pub positions: &'a [NVec3], // particle positions, indexed as in the advector
}

impl Snapshot<'_> {
    pub fn to_owned(&self) -> OwnedSnapshot {
        OwnedSnapshot {
            time: self.time,
            positions: self.positions.to_vec(),
        }
    }
}

/// Detached copy of a [`Snapshot`]
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedSnapshot {
    pub time: f64,
    pub positions: Vec<NVec3>,
}

/// Consumer of scheduled snapshots (file writer, in-memory recorder, ...)
pub trait SnapshotWriter {
    fn write(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

/// Collect snapshots in memory
impl SnapshotWriter for Vec<OwnedSnapshot> {
    fn write(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        self.push(snapshot.to_owned());
        Ok(())
    }
}
