//! Temporal flow modulations
//!
//! Every modulation is a scalar multiplier `F(t)` with a long-run mean of one,
//! so that `v(r, t) = speed_mean * u(r) * F(t)` keeps `speed_mean` as the mean
//! speed in both space and time.

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{ConfigError, FileError, TableOrder};
use crate::io::table::read_table;

#[derive(Debug, Clone, PartialEq)]
pub enum TemporalModulation {
    /// `F(t) = 1`
    None,

    /// `F(t) = amplitude * sin(2π frequency t + phase) + 1 + offset`.
    /// The mean is one only when `offset == 0`.
    Sin {
        frequency: f64,
        amplitude: f64,
        offset: f64,
        phase_deg: f64,
    },

    /// Piecewise-linear interpolation in a `(time, value)` table
    LookupTable(LookupTable),
}

impl TemporalModulation {
    pub fn sin(frequency: f64, amplitude: f64, offset: f64, phase_deg: f64) -> Self {
        if offset != 0.0 {
            warn!("sinusoidal modulation with offset={offset}: mean flow speed is scaled by {}", 1.0 + offset);
        }
        TemporalModulation::Sin { frequency, amplitude, offset, phase_deg }
    }

    /// Multiplier at time `t`
    pub fn value_at(&self, t: f64) -> f64 {
        match self {
            TemporalModulation::None => 1.0,
            TemporalModulation::Sin { frequency, amplitude, offset, phase_deg } => {
                amplitude * (2.0 * PI * frequency * t + phase_deg.to_radians()).sin() + 1.0 + offset
            }
            TemporalModulation::LookupTable(table) => table.value_at(t),
        }
    }
}

/// How a time outside `[tmin, tmax]` is mapped back onto the table
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryStrategy {
    /// Hold the first / last value
    Clamp,
    /// Repeat the table with period `tmax - tmin`
    #[default]
    Cyclic,
    /// Repeat the table, running every other cycle backward
    Reverse,
}

impl FromStr for BoundaryStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp" => Ok(BoundaryStrategy::Clamp),
            "cyclic" => Ok(BoundaryStrategy::Cyclic),
            "reverse" => Ok(BoundaryStrategy::Reverse),
            other => Err(ConfigError::UnknownBoundaryStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for BoundaryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryStrategy::Clamp => "clamp",
            BoundaryStrategy::Cyclic => "cyclic",
            BoundaryStrategy::Reverse => "reverse",
        };
        f.write_str(name)
    }
}

/// Validated, immutable `(time, value)` table.
///
/// Invariant: the minimum time is in the first row and the maximum time in
/// the last row.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    times: Vec<f64>,
    values: Vec<f64>,
    strategy: BoundaryStrategy,
}

impl LookupTable {
    /// Build from explicit rows. With `scale_to_mean_one`, every value is
    /// divided by the arithmetic mean of the values.
    pub fn new(rows: &[[f64; 2]], strategy: BoundaryStrategy, scale_to_mean_one: bool) -> Result<Self, ConfigError> {
        if rows.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        for (row, r) in rows.iter().enumerate() {
            if !(r[0].is_finite() && r[1].is_finite()) {
                return Err(ConfigError::MalformedTable {
                    row,
                    reason: format!("expected finite [time, value], got {r:?}"),
                });
            }
        }

        let times: Vec<f64> = rows.iter().map(|r| r[0]).collect();
        let mut values: Vec<f64> = rows.iter().map(|r| r[1]).collect();

        let argmin = first_index_of(&times, |a, b| a < b);
        if argmin != 0 {
            return Err(ConfigError::TableNotAscending { index: argmin, order: TableOrder::MinimumNotFirst });
        }
        let argmax = first_index_of(&times, |a, b| a > b);
        if argmax != times.len() - 1 {
            return Err(ConfigError::TableNotAscending { index: argmax, order: TableOrder::MaximumNotLast });
        }

        let period = times[times.len() - 1] - times[0];
        if strategy != BoundaryStrategy::Clamp && period <= 0.0 {
            return Err(ConfigError::DegenerateTable {
                reason: format!("\"{strategy}\" boundary strategy needs a time span, but tmin == tmax == {}", times[0]),
            });
        }

        if scale_to_mean_one {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            if mean == 0.0 || !mean.is_finite() {
                return Err(ConfigError::DegenerateTable {
                    reason: format!("cannot scale to a mean of one, mean value is {mean}"),
                });
            }
            for v in values.iter_mut() {
                *v /= mean;
            }
        }

        debug!(
            "lookup table: {} rows over [{}, {}], boundary strategy {strategy}",
            times.len(),
            times[0],
            times[times.len() - 1]
        );

        Ok(Self { times, values, strategy })
    }

    /// Read a two-column `time value` text file, then validate as [`LookupTable::new`]
    pub fn from_file(path: impl AsRef<Path>, strategy: BoundaryStrategy, scale_to_mean_one: bool) -> Result<Self, FileError> {
        let rows = read_table(path)?;
        Ok(Self::new(&rows, strategy, scale_to_mean_one)?)
    }

    pub fn strategy(&self) -> BoundaryStrategy {
        self.strategy
    }

    pub fn t_min(&self) -> f64 {
        self.times[0]
    }

    pub fn t_max(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Rows after optional scaling
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Map any `t` into `[tmin, tmax]` according to the boundary strategy
    pub fn handle_boundary(&self, t: f64) -> f64 {
        let tmin = self.t_min();
        let tmax = self.t_max();
        match self.strategy {
            BoundaryStrategy::Clamp => t.max(tmin).min(tmax),
            BoundaryStrategy::Cyclic => {
                let period = tmax - tmin;
                (t - tmin).rem_euclid(period) + tmin
            }
            BoundaryStrategy::Reverse => {
                let period = tmax - tmin;
                // Truncation maps both the first cycle before tmin and the
                // first cycle after it to 0; shift the negative side down by one.
                let mut cycle = ((t - tmin) / period).trunc() as i64;
                if t < tmin {
                    cycle -= 1;
                }
                if cycle.rem_euclid(2) == 0 {
                    (t - tmin).rem_euclid(period) + tmin
                } else {
                    tmax - (t - tmin).rem_euclid(period)
                }
            }
        }
    }

    /// Linearly interpolated value at `t` (after boundary handling).
    /// No extrapolation below the first row.
    pub fn value_at(&self, t: f64) -> f64 {
        let t = self.handle_boundary(t);
        // first row with time >= t
        let ti = self.times.partition_point(|&x| x < t).min(self.times.len() - 1);
        if ti == 0 {
            return self.values[0];
        }
        let f = (t - self.times[ti - 1]) / (self.times[ti] - self.times[ti - 1]);
        self.values[ti] * f + self.values[ti - 1] * (1.0 - f)
    }
}

/// Index of the first element that is "better" than all others under `better`
fn first_index_of(xs: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if better(x, xs[best]) {
            best = i;
        }
    }
    best
}
