use std::time::Instant;

use crate::error::StepError;
use crate::simulation::advector::Advector;
use crate::simulation::geometry::{Cylinder, Geometry};
use crate::simulation::modulation::TemporalModulation;
use crate::simulation::profile::SpatialProfile;
use crate::simulation::states::NVec3;

/// Helper to build `n` particles spread through a unit cylinder
fn make_particles(n: usize) -> Vec<NVec3> {
    let mut particles = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let r = 0.9 * (i_f * 0.37).sin().abs();
        let phi = i_f * 0.13;
        particles.push(NVec3::new(r * phi.cos(), r * phi.sin(), (i_f * 0.07).sin().abs()));
    }

    particles
}

/// Helper to build an advector over `particles`
fn make_advector(particles: Vec<NVec3>, profile: SpatialProfile) -> Option<Advector> {
    let cylinder = Cylinder::new(1.0, 1.0, NVec3::z(), NVec3::zeros()).ok()?;
    let modulation = TemporalModulation::sin(1.0, 0.5, 0.0, 0.0);
    Advector::new(particles, 0.0, 1.0, Geometry::from(cylinder), profile, modulation).ok()
}

/// Mean wall time of one `move_once(dt)` in ms, after one warm-up step
fn time_move_once(advector: &mut Advector, dt: f64, steps: usize) -> Result<f64, StepError> {
    advector.move_once(dt)?;

    let t0 = Instant::now();
    for _ in 0..steps {
        advector.move_once(dt)?;
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0 / steps as f64)
}

/// Time `move_once` for plug and Poiseuille flow over a range of n
/// Paste output directly into excel to graph
pub fn bench_move_once() {
    println!("N,plug_ms,poiseuille_ms");

    let steps = 5; // steps per profile, averaged
    for n in [1_000, 10_000, 100_000, 1_000_000] {
        let particles = make_particles(n);

        let mut per_profile = Vec::with_capacity(2);
        for profile in [SpatialProfile::Plug, SpatialProfile::Poiseuille] {
            let Some(mut advector) = make_advector(particles.clone(), profile) else {
                eprintln!("could not build benchmark advector");
                return;
            };

            match time_move_once(&mut advector, 1e-3, steps) {
                Ok(ms) => per_profile.push(ms),
                Err(e) => {
                    eprintln!("benchmark step failed for N={n} ({}): {e}", profile.name());
                    return;
                }
            }
        }

        println!("{},{:.6},{:.6}", n, per_profile[0], per_profile[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_reports_step_errors() {
        let mut advector = make_advector(make_particles(10), SpatialProfile::Plug).unwrap();

        assert!(time_move_once(&mut advector, 1e-3, 3).unwrap() >= 0.0);
        assert!(matches!(
            time_move_once(&mut advector, f64::NAN, 3),
            Err(StepError::InvalidStep { .. })
        ));
    }
}
