//! Spatial velocity profiles
//!
//! A profile maps a particle position to a directional velocity weight.
//! Profiles are normalized to a MEAN of one over the cross-section (not a
//! maximum of one), so `speed_mean` keeps its meaning for every profile.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::simulation::geometry::Geometry;
use crate::simulation::states::NVec3;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialProfile {
    /// Uniform velocity along the geometry axis
    #[serde(rename = "plug")]
    Plug,

    /// Hagen–Poiseuille parabola `2 (1 - r²/R²)`, zero at the wall, peak 2 on the axis
    #[serde(rename = "poiseuille")]
    Poiseuille,
}

impl SpatialProfile {
    pub fn name(&self) -> &'static str {
        match self {
            SpatialProfile::Plug => "plug",
            SpatialProfile::Poiseuille => "Poiseuille",
        }
    }

    /// Check once, at setup, that the profile can be evaluated on `geometry`
    pub fn check_geometry(&self, geometry: &Geometry) -> Result<(), ConfigError> {
        match self {
            SpatialProfile::Plug => Ok(()),
            SpatialProfile::Poiseuille => match geometry.as_cylinder() {
                Some(_) => Ok(()),
                None => Err(ConfigError::ProfileGeometryMismatch {
                    profile: self.name(),
                    geometry: geometry.name(),
                }),
            },
        }
    }

    /// Velocity weight for a single particle
    pub fn weight(&self, pos: &NVec3, geometry: &Geometry) -> Result<NVec3, ConfigError> {
        let orientation = geometry.orientation();
        match self {
            SpatialProfile::Plug => Ok(*orientation),
            SpatialProfile::Poiseuille => {
                let cyl = geometry.as_cylinder().ok_or(ConfigError::ProfileGeometryMismatch {
                    profile: self.name(),
                    geometry: geometry.name(),
                })?;
                // Radial distance is measured in the x-y plane around the
                // origin, i.e. the axis is assumed to be z.
                let dx = pos.x - cyl.origin().x;
                let dy = pos.y - cyl.origin().y;
                let r2_rel = (dx * dx + dy * dy) / (cyl.radius() * cyl.radius());
                Ok(2.0 * (1.0 - r2_rel) * orientation)
            }
        }
    }

    /// Velocity weights for a whole particle set; `out[i]` matches `positions[i]`
    pub fn weights(&self, positions: &[NVec3], geometry: &Geometry, out: &mut Vec<NVec3>) -> Result<(), ConfigError> {
        out.clear();
        out.reserve(positions.len());
        for p in positions {
            out.push(self.weight(p, geometry)?);
        }
        Ok(())
    }
}
