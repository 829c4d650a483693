//! Write schedules
//!
//! A run is either a single uniform sampling of a duration, or a nested
//! "camera" sampling: a coarse major grid, and after every major sample a
//! short burst of micro samples covering the exposure window.

use crate::error::ConfigError;

/// Relative tolerance under which two sample times are the same sample
pub(crate) const COINCIDE_TOL: f64 = 1e-9;

/// `n_write` equally spaced samples over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub duration: f64,
    pub n_write: usize,
}

impl Window {
    /// A zero-duration window is never sampled, so it may carry `n_write = 0`.
    pub fn new(duration: f64, n_write: usize) -> Result<Self, ConfigError> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(ConfigError::NegativeDuration { value: duration });
        }
        if n_write == 0 && duration != 0.0 {
            return Err(ConfigError::NonPositiveWriteCount);
        }
        Ok(Self { duration, n_write })
    }

    /// Spacing between consecutive writes
    pub fn interval(&self) -> f64 {
        if self.n_write == 0 {
            return 0.0;
        }
        self.duration / self.n_write as f64
    }

    /// Writes produced when sampled on its own (none for a zero duration)
    fn writes(&self) -> usize {
        if self.duration == 0.0 {
            0
        } else {
            self.n_write
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    Uniform(Window),
    Nested { micro: Window, major: Window },
}

impl Schedule {
    pub fn uniform(duration: f64, n_write: usize) -> Result<Self, ConfigError> {
        Ok(Schedule::Uniform(Window::new(duration, n_write)?))
    }

    /// Build from a pair of `(duration, n_write)` entries, either of which
    /// may be absent as a whole.
    ///
    /// - a duration without a count (or vice versa) is rejected
    /// - one absent pair reduces to [`Schedule::Uniform`] on the other
    /// - the pairs are ordered so the shorter duration is the micro window
    pub fn new(durations: [Option<f64>; 2], counts: [Option<usize>; 2]) -> Result<Self, ConfigError> {
        for i in 0..2 {
            if durations[i].is_some() != counts[i].is_some() {
                return Err(ConfigError::InconsistentSchedule {
                    reason: format!(
                        "durations {durations:?} and write counts {counts:?} have inconsistent missing entries"
                    ),
                });
            }
        }

        let pairs: Vec<(f64, usize)> = durations
            .iter()
            .zip(counts.iter())
            .filter_map(|(t, n)| Some(((*t)?, (*n)?)))
            .collect();

        match pairs.as_slice() {
            [] => Err(ConfigError::InconsistentSchedule {
                reason: "neither a duration nor a write count was given".to_string(),
            }),
            [(t, n)] => Schedule::uniform(*t, *n),
            [a, b] => {
                let (micro, major) = if a.0 > b.0 { (b, a) } else { (a, b) };
                let micro = Window::new(micro.0, micro.1)?;
                // the major count is checked even for a zero major duration
                if major.1 == 0 {
                    return Err(ConfigError::NonPositiveWriteCount);
                }
                let major = Window::new(major.0, major.1)?;
                if micro.duration - major.interval() > COINCIDE_TOL * major.interval() {
                    return Err(ConfigError::InconsistentSchedule {
                        reason: format!(
                            "integration window {} is longer than the sampling interval {}",
                            micro.duration,
                            major.interval()
                        ),
                    });
                }
                Ok(Schedule::Nested { micro, major })
            }
            _ => unreachable!("at most two windows"),
        }
    }

    /// True when every micro window ends exactly on the next major sample
    /// (continuous exposure). The major sample is then the last micro sample
    /// of the previous window and is not written a second time.
    pub fn windows_coincide(&self) -> bool {
        match self {
            Schedule::Uniform(_) => false,
            Schedule::Nested { micro, major } => {
                micro.duration > 0.0 && (major.interval() - micro.duration).abs() <= COINCIDE_TOL * major.interval()
            }
        }
    }

    /// Number of snapshots a run with this schedule hands to the writer
    pub fn expected_writes(&self, write_start: bool) -> usize {
        let start = usize::from(write_start);
        match self {
            Schedule::Uniform(w) => start + w.writes(),
            Schedule::Nested { micro, major } => {
                let start = start * (1 + micro.writes());
                if major.duration == 0.0 {
                    return start;
                }
                let major_writes = match (self.windows_coincide(), write_start) {
                    (false, _) => major.n_write,
                    (true, true) => 0,
                    (true, false) => 1,
                };
                start + major_writes + major.n_write * micro.writes()
            }
        }
    }

    /// Time covered by the run
    pub fn total_duration(&self) -> f64 {
        match self {
            Schedule::Uniform(w) => w.duration,
            Schedule::Nested { major, .. } if major.duration == 0.0 => 0.0,
            Schedule::Nested { micro, major } => major.duration + micro.duration,
        }
    }
}
