//! Bounded regions that particles are confined to
//!
//! A shape only knows how to map an arbitrary point back into (or against)
//! itself via [`Shape::constrain`]. [`Geometry`] is the closed set of shapes
//! the engine can be configured with; new shapes are added as new variants.

use crate::error::ConfigError;
use crate::simulation::states::NVec3;

/// Capability shared by every confining shape
pub trait Shape {
    /// Map `particle` back into the shape.
    /// - `periodic = true`: wrap around (cyclic boundary)
    /// - `periodic = false`: clamp onto the nearest boundary
    fn constrain(&self, particle: &NVec3, periodic: bool) -> NVec3;

    /// Constrain every particle in place
    fn constrain_all(&self, particles: &mut [NVec3], periodic: bool) {
        for p in particles.iter_mut() {
            *p = self.constrain(p, periodic);
        }
    }
}

/// Cylinder with arbitrary axis.
///
/// Only the axial coordinate is bounded. The radial direction is left
/// unchecked: a particle leaving through the mantle is the caller's modeling
/// choice, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    orientation: NVec3, // unit vector along the axis
    origin: NVec3, // center of the base circle
    length: f64,
    radius: f64,
}

impl Cylinder {
    /// Build a cylinder. `orientation` is normalized here, so any non-zero
    /// finite vector is accepted.
    pub fn new(length: f64, radius: f64, orientation: NVec3, origin: NVec3) -> Result<Self, ConfigError> {
        if !(length.is_finite() && length > 0.0) {
            return Err(ConfigError::InvalidDimension { name: "length", value: length });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::InvalidDimension { name: "radius", value: radius });
        }
        let norm = orientation.norm();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(ConfigError::InvalidVector {
                name: "orientation",
                value: [orientation.x, orientation.y, orientation.z],
            });
        }
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::InvalidVector {
                name: "origin",
                value: [origin.x, origin.y, origin.z],
            });
        }

        Ok(Self {
            orientation: orientation / norm,
            origin,
            length,
            radius,
        })
    }

    pub fn orientation(&self) -> &NVec3 {
        &self.orientation
    }

    pub fn origin(&self) -> &NVec3 {
        &self.origin
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Center of the cylinder on its axis. Measuring from here makes the
    /// overflow past either end symmetric.
    pub fn axial_center(&self) -> NVec3 {
        self.origin + self.orientation * (0.5 * self.length)
    }
}

impl Shape for Cylinder {
    fn constrain(&self, particle: &NVec3, periodic: bool) -> NVec3 {
        let shift = self.axial_center();
        let pos_rel = particle - shift;
        let proj = pos_rel.dot(&self.orientation);

        let offset = if periodic {
            // Whole lengths drifted, rounded to nearest with ties toward zero:
            // a particle exactly on an end face stays on that face.
            let k = sign(proj) * (proj.abs() / self.length - 0.5).ceil();
            k * self.length
        } else if proj.abs() > 0.5 * self.length {
            proj - sign(proj) * 0.5 * self.length
        } else {
            0.0
        };

        if offset == 0.0 {
            return *particle;
        }
        (pos_rel - offset * self.orientation) + shift
    }
}

/// Sign with `sign(0) == 0`
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Every shape the engine can be configured with
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Cylinder(Cylinder),
}

impl Geometry {
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Cylinder(_) => "cylinder",
        }
    }

    pub fn as_cylinder(&self) -> Option<&Cylinder> {
        match self {
            Geometry::Cylinder(c) => Some(c),
        }
    }

    /// Unit flow direction of the shape
    pub fn orientation(&self) -> &NVec3 {
        match self {
            Geometry::Cylinder(c) => c.orientation(),
        }
    }
}

impl Shape for Geometry {
    fn constrain(&self, particle: &NVec3, periodic: bool) -> NVec3 {
        match self {
            Geometry::Cylinder(c) => c.constrain(particle, periodic),
        }
    }
}

impl From<Cylinder> for Geometry {
    fn from(c: Cylinder) -> Self {
        Geometry::Cylinder(c)
    }
}
