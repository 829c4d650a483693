//! Explicit-Euler particle advection and the write scheduler
//!
//! The advector owns the particle set and the simulation clock. Velocity is
//! `speed_mean * profile(x) * modulation(t)`; after every step the particles
//! are wrapped back into the geometry with periodic boundaries.
//!
//! Scheduling comes in three layers:
//! - [`Advector::evolve_for`]: advance by `T` in steps of `dt`, landing exactly on `t + T`
//! - [`Advector::repeat_evolve`]: `n` equally spaced writes over `T`
//! - [`Advector::multi_repeat_evolve`]: a [`Schedule`], possibly nested (major + micro)

use log::{debug, info, trace};

use crate::error::{ConfigError, StepError};
use crate::simulation::geometry::{Geometry, Shape};
use crate::simulation::modulation::TemporalModulation;
use crate::simulation::profile::SpatialProfile;
use crate::simulation::schedule::{Schedule, Window, COINCIDE_TOL};
use crate::simulation::states::{NVec3, Snapshot, SnapshotWriter};

/// The last step may be up to this factor of `dt` long, so the target time is
/// hit without a vanishingly small trailing step.
const LAST_STEP_STRETCH: f64 = 1.01;

#[derive(Debug, Clone)]
pub struct Advector {
    positions: Vec<NVec3>, // live particle set, index = identity
    time: f64, // simulation clock, never decreases
    speed_mean: f64, // mean speed over space and time
    geometry: Geometry,
    profile: SpatialProfile,
    modulation: TemporalModulation,
    weights: Vec<NVec3>, // scratch buffer for profile evaluation
}

impl Advector {
    /// Build an advector. The profile is checked against the geometry here, so
    /// a mismatch is reported before any stepping.
    pub fn new(
        positions: Vec<NVec3>,
        start_time: f64,
        speed_mean: f64,
        geometry: Geometry,
        profile: SpatialProfile,
        modulation: TemporalModulation,
    ) -> Result<Self, ConfigError> {
        if !speed_mean.is_finite() {
            return Err(ConfigError::NonFinite { name: "speed_mean", value: speed_mean });
        }
        if !start_time.is_finite() {
            return Err(ConfigError::NonFinite { name: "start_time", value: start_time });
        }
        profile.check_geometry(&geometry)?;

        let n = positions.len();
        Ok(Self {
            positions,
            time: start_time,
            speed_mean,
            geometry,
            profile,
            modulation,
            weights: Vec::with_capacity(n),
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn positions(&self) -> &[NVec3] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<NVec3> {
        self.positions
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Current state as a borrowed snapshot
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            time: self.time,
            positions: &self.positions,
        }
    }

    /// Advance every particle by one explicit-Euler step of size `dt`.
    ///
    /// `dt = 0` is legal: particles do not move, but the periodic boundary is
    /// still applied, which makes an initial condition consistent with every
    /// later step.
    pub fn move_once(&mut self, dt: f64) -> Result<(), StepError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(StepError::InvalidStep { dt, expected: "a finite, non-negative" });
        }

        // u(x_n) for every particle, F(t_n) once
        self.profile.weights(&self.positions, &self.geometry, &mut self.weights)?;
        let factor = self.modulation.value_at(self.time);

        // x_n+1 = x_n + u(x_n) * U * F(t_n) * dt
        let scale = self.speed_mean * factor * dt;
        for (x, u) in self.positions.iter_mut().zip(self.weights.iter()) {
            *x += u * scale;
        }

        // t_n+1 = t_n + dt
        self.time += dt;

        // wrap back into the geometry
        self.geometry.constrain_all(&mut self.positions, true);
        Ok(())
    }

    /// Advance from the current time `t0` to exactly `t0 + duration` with
    /// steps of `dt`. When less than `1.01 * dt` remains, the rest is taken as
    /// one step. With a `sink`, the final state is written once.
    ///
    /// Returns the number of steps taken. `duration = 0` returns immediately
    /// without writing.
    pub fn evolve_for(&mut self, dt: f64, duration: f64, sink: Option<&mut dyn SnapshotWriter>) -> Result<u64, StepError> {
        let t00 = self.time;
        debug!("evolve_for(dt={dt}, T={duration}, write={}) from t={t00}", sink.is_some());

        if !(dt.is_finite() && dt > 0.0) {
            return Err(StepError::InvalidStep { dt, expected: "a finite, positive" });
        }
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(StepError::NegativeDuration { duration });
        }
        if duration == 0.0 {
            debug!("T=0, nothing to evolve");
            return Ok(0);
        }

        let target = t00 + duration;
        let mut t0 = t00;
        // Step targets are t00 + i*dt rather than a running sum, so rounding
        // errors in dt do not accumulate.
        let mut i: u64 = 0;
        loop {
            i += 1;
            let (t1, done) = if t0 + dt * LAST_STEP_STRETCH > target {
                (target, true)
            } else {
                (t00 + i as f64 * dt, false)
            };
            trace!("  (t0, t1, dt) = ({t0}, {t1}, {})", t1 - t0);
            self.move_once(t1 - t0)?;
            self.time = t1;
            t0 = t1;
            if done {
                break;
            }
        }

        if let Some(sink) = sink {
            self.write(sink)?;
        }
        Ok(i)
    }

    /// Split `duration` into `n_write` equal intervals and write after each.
    ///
    /// With `write_start`, the initial condition is first constrained (a
    /// zero-length step) and written, even when `duration = 0`.
    pub fn repeat_evolve(
        &mut self,
        dt: f64,
        duration: f64,
        n_write: usize,
        write_start: bool,
        sink: &mut dyn SnapshotWriter,
    ) -> Result<(), StepError> {
        let window = Window::new(duration, n_write)?;
        self.run_window(dt, &window, write_start, sink)
    }

    /// Run a full [`Schedule`].
    ///
    /// For a nested schedule, every major window first jumps to the window's
    /// end time and writes, then samples the micro window starting from that
    /// major time. With `write_start`, the start time gets the same micro
    /// sampling as every major sample. A major sample that coincides with the
    /// end of the previous micro window is written only once.
    pub fn multi_repeat_evolve(
        &mut self,
        dt: f64,
        schedule: &Schedule,
        write_start: bool,
        sink: &mut dyn SnapshotWriter,
    ) -> Result<(), StepError> {
        debug!("multi_repeat_evolve(dt={dt}, schedule={schedule:?}, write_start={write_start})");
        match schedule {
            Schedule::Uniform(window) => self.run_window(dt, window, write_start, sink),
            Schedule::Nested { micro, major } => {
                let t00 = self.time;
                let interval = major.interval();

                if write_start {
                    self.run_window(dt, micro, true, sink)?;
                }
                if major.duration == 0.0 {
                    debug!("major T=0, nothing to evolve");
                    return Ok(());
                }

                for i in 1..=major.n_write {
                    // jump to the next major sample, measured from t00 so the
                    // micro windows do not shift the major grid
                    let target = t00 + i as f64 * interval;
                    let jump = target - self.time;
                    if jump > COINCIDE_TOL * interval {
                        self.evolve_for(dt, jump, Some(&mut *sink))?;
                    } else {
                        debug!("major sample t={target} is the end of the previous window, already written");
                    }

                    // camera integration samples after the major sample
                    self.run_window(dt, micro, false, sink)?;
                }
                Ok(())
            }
        }
    }

    fn run_window(&mut self, dt: f64, window: &Window, write_start: bool, sink: &mut dyn SnapshotWriter) -> Result<(), StepError> {
        debug!(
            "repeat_evolve(dt={dt}, T={}, n_write={}, write_start={write_start}) from t={}",
            window.duration, window.n_write, self.time
        );
        if write_start {
            self.move_once(0.0)?;
            self.write(sink)?;
        }
        if window.duration == 0.0 {
            return Ok(());
        }

        let per_write = window.interval();
        for _ in 0..window.n_write {
            self.evolve_for(dt, per_write, Some(&mut *sink))?;
        }
        Ok(())
    }

    fn write(&self, sink: &mut dyn SnapshotWriter) -> Result<(), StepError> {
        info!("writing {} particles at t={}", self.positions.len(), self.time);
        sink.write(&self.snapshot())?;
        Ok(())
    }
}
