//! Build a fully-initialized run from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) plus the initial particle set and
//! produces a `Scenario` containing:
//! - the `Advector` (geometry, profile, modulation, particles at the start time)
//! - the validated `Schedule`
//! - step size and whether the initial condition is written

use log::info;

use crate::configuration::config::{GeometryConfig, ModulationConfig, ScenarioConfig};
use crate::error::{ConfigError, StepError};
use crate::simulation::advector::Advector;
use crate::simulation::geometry::{Cylinder, Geometry};
use crate::simulation::modulation::{LookupTable, TemporalModulation};
use crate::simulation::schedule::Schedule;
use crate::simulation::states::{NVec3, SnapshotWriter};

/// Runtime bundle for one advection run
#[derive(Debug, Clone)]
pub struct Scenario {
    pub advector: Advector,
    pub schedule: Schedule,
    pub dt: f64,
    pub write_start: bool,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig, positions: Vec<NVec3>, start_time: f64) -> Result<Self, ConfigError> {
        // Geometry: arrays -> nalgebra vectors, orientation normalized by the constructor
        let geometry = match cfg.geometry {
            GeometryConfig::Cylinder { radius, length, origin, orientation } => {
                Geometry::from(Cylinder::new(length, radius, NVec3::from(orientation), NVec3::from(origin))?)
            }
        };

        let modulation = build_modulation(cfg.flow.modulation)?;

        // Schedule: major (t_total, n_total) and micro (t_integration, n_integration)
        let s_cfg = cfg.schedule;
        if !(s_cfg.dt.is_finite() && s_cfg.dt > 0.0) {
            return Err(ConfigError::InvalidDimension { name: "dt", value: s_cfg.dt });
        }
        let schedule = Schedule::new(
            [s_cfg.t_integration, s_cfg.t_total],
            [s_cfg.n_integration, s_cfg.n_total],
        )?;

        let advector = Advector::new(
            positions,
            start_time,
            cfg.flow.speed_mean,
            geometry,
            cfg.flow.profile,
            modulation,
        )?;

        Ok(Self {
            advector,
            schedule,
            dt: s_cfg.dt,
            write_start: s_cfg.write_start,
        })
    }

    /// Run the whole schedule, handing every scheduled snapshot to `sink`
    pub fn run(&mut self, sink: &mut dyn SnapshotWriter) -> Result<(), StepError> {
        info!(
            "advecting {} particles from t={} over {} (dt={}, {} writes)",
            self.advector.positions().len(),
            self.advector.time(),
            self.schedule.total_duration(),
            self.dt,
            self.schedule.expected_writes(self.write_start)
        );
        self.advector.multi_repeat_evolve(self.dt, &self.schedule, self.write_start, sink)?;
        info!("done at t={}", self.advector.time());
        Ok(())
    }
}

fn build_modulation(cfg: ModulationConfig) -> Result<TemporalModulation, ConfigError> {
    let modulation = match cfg {
        ModulationConfig::None => TemporalModulation::None,
        ModulationConfig::Sin { frequency, amplitude, offset, phase_deg } => {
            TemporalModulation::sin(frequency, amplitude, offset, phase_deg)
        }
        ModulationConfig::LookupTable { table, rows, boundary_strategy, scale_to_mean_one } => {
            let table = match (table, rows) {
                (Some(path), None) => LookupTable::from_file(&path, boundary_strategy, scale_to_mean_one)
                    .map_err(|e| ConfigError::TableFile { path, reason: e.to_string() })?,
                (None, Some(rows)) => LookupTable::new(&rows, boundary_strategy, scale_to_mean_one)?,
                _ => return Err(ConfigError::TableSource),
            };
            TemporalModulation::LookupTable(table)
        }
    };
    Ok(modulation)
}
