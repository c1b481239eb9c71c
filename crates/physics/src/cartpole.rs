//! Batched cart-pole dynamics.
//!
//! Each environment has two degrees of freedom:
//!
//! -   DOF 0 ([`CART_DOF`]): the cart's position along its slider, driven by
//!     an effort (force).
//! -   DOF 1 ([`POLE_DOF`]): the pole's angle from vertical, an undriven
//!     hinge. Positive angles lean towards positive cart positions.
//!
//! The equations of motion are the classic cart-pole ones (Barto, Sutton &
//! Anderson, 1983) integrated with semi-implicit Euler.

use crate::config::SimConfig;
use crate::error::PhysicsError;
use rayon::prelude::*;

pub const NUM_DOF: usize = 2;
pub const CART_DOF: usize = 0;
pub const POLE_DOF: usize = 1;

/// DOF state and efforts of `num_envs` independent cart-poles.
pub struct CartPoleBatch {
    dof_pos: Vec<[f32; NUM_DOF]>,
    dof_vel: Vec<[f32; NUM_DOF]>,
    efforts: Vec<[f32; NUM_DOF]>,
    config: SimConfig,
}

impl CartPoleBatch {
    /// Creates `num_envs` cart-poles at rest with the pole upright.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidParam`] if `config` does not validate.
    pub fn new(num_envs: usize, config: SimConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        tracing::debug!(num_envs, dt = config.dt, substeps = config.substeps, "created cart-pole batch");
        Ok(Self {
            dof_pos: vec![[0.0; NUM_DOF]; num_envs],
            dof_vel: vec![[0.0; NUM_DOF]; num_envs],
            efforts: vec![[0.0; NUM_DOF]; num_envs],
            config,
        })
    }

    #[must_use]
    pub fn num_envs(&self) -> usize {
        self.dof_pos.len()
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// `[cart, pole]` positions per environment.
    #[must_use]
    pub fn dof_pos(&self) -> &[[f32; NUM_DOF]] {
        &self.dof_pos
    }

    /// `[cart, pole]` velocities per environment.
    #[must_use]
    pub fn dof_vel(&self) -> &[[f32; NUM_DOF]] {
        &self.dof_vel
    }

    /// DOF positions as one flat `[num_envs × NUM_DOF]` slice.
    #[must_use]
    pub fn dof_pos_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.dof_pos)
    }

    /// DOF velocities as one flat `[num_envs × NUM_DOF]` slice.
    #[must_use]
    pub fn dof_vel_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.dof_vel)
    }

    /// Sets the efforts applied during the next [`simulate`](Self::simulate).
    ///
    /// `forces` is flat `[num_envs × NUM_DOF]`. Only the cart DOF is driven;
    /// efforts on the pole hinge are stored but have no effect.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ShapeMismatch`] if `forces` has the wrong length.
    pub fn set_actuation_forces(&mut self, forces: &[f32]) -> Result<(), PhysicsError> {
        let expected = self.num_envs() * NUM_DOF;
        if forces.len() != expected {
            return Err(PhysicsError::ShapeMismatch {
                what: "actuation forces",
                expected,
                actual: forces.len(),
            });
        }
        bytemuck::cast_slice_mut::<_, f32>(&mut self.efforts).copy_from_slice(forces);
        Ok(())
    }

    /// Overwrites the DOF state of the environments in `ids`.
    ///
    /// `positions` and `velocities` are flat `[ids.len() × NUM_DOF]`, in the
    /// order of `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ShapeMismatch`] if either buffer has the wrong
    /// length, and [`PhysicsError::InvalidParam`] for an id outside the batch.
    pub fn set_dof_state_indexed(
        &mut self,
        ids: &[usize],
        positions: &[f32],
        velocities: &[f32],
    ) -> Result<(), PhysicsError> {
        let expected = ids.len() * NUM_DOF;
        for (what, buf) in [("dof positions", positions), ("dof velocities", velocities)] {
            if buf.len() != expected {
                return Err(PhysicsError::ShapeMismatch { what, expected, actual: buf.len() });
            }
        }
        if let Some(&bad) = ids.iter().find(|&&i| i >= self.num_envs()) {
            return Err(PhysicsError::InvalidParam {
                param: "ids",
                message: format!("env id {bad} out of range for {} envs", self.num_envs()),
            });
        }

        let positions: &[[f32; NUM_DOF]] = bytemuck::cast_slice(positions);
        let velocities: &[[f32; NUM_DOF]] = bytemuck::cast_slice(velocities);
        for ((&i, pos), vel) in ids.iter().zip(positions).zip(velocities) {
            self.dof_pos[i] = *pos;
            self.dof_vel[i] = *vel;
        }
        Ok(())
    }

    /// Advances every environment by one step of `dt`.
    pub fn simulate(&mut self) {
        let cfg = &self.config;
        #[allow(clippy::cast_precision_loss)]
        let h = cfg.dt / cfg.substeps as f32;
        let params = Params::from(cfg);

        self.dof_pos
            .par_iter_mut()
            .zip(self.dof_vel.par_iter_mut())
            .zip(self.efforts.par_iter())
            .for_each(|((pos, vel), effort)| {
                for _ in 0..cfg.substeps {
                    let (cart_acc, pole_acc) = params.accelerations(pos[POLE_DOF], vel[POLE_DOF], effort[CART_DOF]);
                    vel[CART_DOF] += cart_acc * h;
                    vel[POLE_DOF] += pole_acc * h;
                    pos[CART_DOF] += vel[CART_DOF] * h;
                    pos[POLE_DOF] += vel[POLE_DOF] * h;
                }
            });
        tracing::trace!(num_envs = self.num_envs(), "simulated step");
    }
}

#[derive(Clone, Copy)]
struct Params {
    gravity: f32,
    pole_mass: f32,
    total_mass: f32,
    half_length: f32,
}

impl From<&SimConfig> for Params {
    fn from(cfg: &SimConfig) -> Self {
        Self {
            gravity: cfg.gravity,
            pole_mass: cfg.pole_mass,
            total_mass: cfg.cart_mass + cfg.pole_mass,
            half_length: cfg.pole_half_length,
        }
    }
}

impl Params {
    /// Cart and pole accelerations for pole angle `theta`, pole angular
    /// velocity `theta_dot` and cart force `force`.
    fn accelerations(&self, theta: f32, theta_dot: f32, force: f32) -> (f32, f32) {
        let (sin, cos) = theta.sin_cos();
        let pole_ml = self.pole_mass * self.half_length;
        let temp = (force + pole_ml * theta_dot * theta_dot * sin) / self.total_mass;
        let pole_acc = (self.gravity * sin - cos * temp)
            / (self.half_length * (4.0 / 3.0 - self.pole_mass * cos * cos / self.total_mass));
        let cart_acc = temp - pole_ml * pole_acc * cos / self.total_mass;
        (cart_acc, pole_acc)
    }
}
