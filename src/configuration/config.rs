//! Configuration types for loading advection scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! run. A scenario consists of:
//!
//! - [`FlowConfig`]       – mean speed, spatial profile and temporal modulation
//! - [`GeometryConfig`]   – the confining shape
//! - [`ScheduleConfig`]   – step size and the (optionally nested) write schedule
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Selectors are tagged enums, so an unknown profile, modulation, shape or
//! boundary strategy name fails when the file is loaded.
//!
//! # YAML format
//!
//! ```yaml
//! flow:
//!   speed_mean: 1.0e-3
//!   profile: poiseuille           # plug | poiseuille
//!   modulation:
//!     kind: lookup_table          # none | sin | lookup_table
//!     table: heartbeat.dat        # or `rows: [[0.0, 1.0], [1.0, 2.0]]`
//!     boundary_strategy: reverse  # clamp | cyclic | reverse
//!
//! geometry:
//!   shape: cylinder
//!   radius: 1.0e-3
//!   length: 5.0e-3
//!   origin: [0.0, 0.0, 0.0]
//!   orientation: [0.0, 0.0, 1.0]
//!
//! schedule:
//!   dt: 1.0e-4
//!   t_total: 1.0                  # major sampling
//!   n_total: 10
//!   t_integration: 1.0e-3         # camera exposure (optional)
//!   n_integration: 2
//! ```
//!
//! Relative table paths are resolved against the scenario file's directory by
//! [`ScenarioConfig::resolve_paths`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::simulation::modulation::BoundaryStrategy;
use crate::simulation::profile::SpatialProfile;

/// Temporal modulation selector and its arguments
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModulationConfig {
    /// Steady flow
    #[default]
    None,

    /// Sinusoid around one
    Sin {
        frequency: f64,
        amplitude: f64,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        phase_deg: f64,
    },

    /// Interpolated table, given inline (`rows`) or as a file (`table`)
    LookupTable {
        table: Option<PathBuf>,
        rows: Option<Vec<[f64; 2]>>,
        #[serde(default)]
        boundary_strategy: BoundaryStrategy,
        #[serde(default = "default_true")]
        scale_to_mean_one: bool,
    },
}

/// Velocity field: `speed_mean * profile(x) * modulation(t)`
#[derive(Deserialize, Debug, Clone)]
pub struct FlowConfig {
    pub speed_mean: f64, // mean speed in space and time
    pub profile: SpatialProfile, // spatial velocity profile
    #[serde(default)]
    pub modulation: ModulationConfig, // temporal modulation, steady if omitted
}

/// Confining shape
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometryConfig {
    Cylinder {
        radius: f64,
        length: f64,
        #[serde(default)]
        origin: [f64; 3], // center of the base circle
        #[serde(default = "default_orientation")]
        orientation: [f64; 3], // axis direction, normalized on build
    },
}

/// Step size and write schedule
#[derive(Deserialize, Debug, Clone)]
pub struct ScheduleConfig {
    pub dt: f64, // integration step
    pub t_total: Option<f64>, // total simulated time (major window)
    pub n_total: Option<usize>, // writes over t_total
    #[serde(default)]
    pub t_integration: Option<f64>, // camera integration window (micro)
    #[serde(default)]
    pub n_integration: Option<usize>, // writes per integration window
    #[serde(default = "default_true")]
    pub write_start: bool, // also write the (constrained) initial condition
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub flow: FlowConfig,
    pub geometry: GeometryConfig,
    pub schedule: ScheduleConfig,
}

impl ScenarioConfig {
    /// Make relative file references relative to `base_dir`
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        if let ModulationConfig::LookupTable { table: Some(path), .. } = &mut self.flow.modulation {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_orientation() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}
