//! The `sim` section of a task file.

use crate::error::PhysicsError;
use serde::Deserialize;

/// Which world axis points up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    Y,
    #[default]
    Z,
}

/// Simulation parameters for a cart-pole batch.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    /// Duration of one simulation step in seconds.
    pub dt: f32,
    /// Integration substeps per simulation step.
    pub substeps: u32,
    pub up_axis: UpAxis,
    /// Magnitude of gravitational acceleration.
    pub gravity: f32,
    pub cart_mass: f32,
    pub pole_mass: f32,
    /// Distance from the hinge to the pole's centre of mass.
    pub pole_half_length: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            substeps: 2,
            up_axis: UpAxis::Z,
            gravity: 9.81,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_half_length: 0.5,
        }
    }
}

impl SimConfig {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidParam`] for the first value the
    /// integrator cannot work with.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.substeps == 0 {
            return Err(PhysicsError::InvalidParam {
                param: "substeps",
                message: "must be at least 1".to_string(),
            });
        }
        for (param, value) in [
            ("dt", self.dt),
            ("cartMass", self.cart_mass),
            ("poleMass", self.pole_mass),
            ("poleHalfLength", self.pole_half_length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidParam {
                    param,
                    message: format!("must be finite and greater than zero, got {value}"),
                });
            }
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidParam {
                param: "gravity",
                message: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}
