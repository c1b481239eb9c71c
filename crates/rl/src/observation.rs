//! Observation buffer for the commanded cart-pole.
//!
//! Each environment observes five values, in this order:
//!
//! | index | value |
//! |-------|-------|
//! | 0 | cart position |
//! | 1 | cart velocity |
//! | 2 | pole angle |
//! | 3 | pole angular velocity |
//! | 4 | commanded cart position |
//!
//! Storage is one column per component so the reward kernel can borrow the
//! columns directly. Policies that expect `[num_envs × 5]` rows use
//! [`ObsBuffer::write_row_major`].

use crate::reward::RewardInputs;

/// Number of observation components per environment.
pub const NUM_OBS: usize = 5;

pub const CART_POS: usize = 0;
pub const CART_VEL: usize = 1;
pub const POLE_ANGLE: usize = 2;
pub const POLE_VEL: usize = 3;
pub const COMMAND: usize = 4;

/// Struct-of-arrays observation storage for a batch of environments.
#[derive(Clone, Debug)]
pub struct ObsBuffer {
    cart_pos: Vec<f32>,
    cart_vel: Vec<f32>,
    pole_angle: Vec<f32>,
    pole_vel: Vec<f32>,
    command: Vec<f32>,
}

impl ObsBuffer {
    #[must_use]
    pub fn new(num_envs: usize) -> Self {
        Self {
            cart_pos: vec![0.0; num_envs],
            cart_vel: vec![0.0; num_envs],
            pole_angle: vec![0.0; num_envs],
            pole_vel: vec![0.0; num_envs],
            command: vec![0.0; num_envs],
        }
    }

    #[must_use]
    pub fn num_envs(&self) -> usize {
        self.cart_pos.len()
    }

    /// Refreshes the observations of `ids`, or of every environment when
    /// `ids` is `None`.
    ///
    /// `dof_pos` and `dof_vel` hold `[cart, pole]` per environment. Rows not
    /// named in `ids` keep their previous values.
    pub fn assemble(
        &mut self,
        ids: Option<&[usize]>,
        dof_pos: &[[f32; 2]],
        dof_vel: &[[f32; 2]],
        commands: &[f32],
    ) {
        let n = self.num_envs();
        debug_assert_eq!(dof_pos.len(), n, "dof_pos length");
        debug_assert_eq!(dof_vel.len(), n, "dof_vel length");
        debug_assert_eq!(commands.len(), n, "commands length");

        match ids {
            Some(ids) => {
                for &i in ids {
                    self.write(i, dof_pos[i], dof_vel[i], commands[i]);
                }
            }
            None => {
                for i in 0..n {
                    self.write(i, dof_pos[i], dof_vel[i], commands[i]);
                }
            }
        }
    }

    fn write(&mut self, i: usize, pos: [f32; 2], vel: [f32; 2], command: f32) {
        self.cart_pos[i] = pos[0];
        self.cart_vel[i] = vel[0];
        self.pole_angle[i] = pos[1];
        self.pole_vel[i] = vel[1];
        self.command[i] = command;
    }

    /// Observation of environment `i`, ordered as in the module table.
    #[must_use]
    pub fn row(&self, i: usize) -> [f32; NUM_OBS] {
        [
            self.cart_pos[i],
            self.cart_vel[i],
            self.pole_angle[i],
            self.pole_vel[i],
            self.command[i],
        ]
    }

    /// Writes every row into `out`, which must hold `num_envs × 5` values.
    pub fn write_row_major(&self, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.num_envs() * NUM_OBS, "row-major buffer length");
        for (i, chunk) in out.chunks_exact_mut(NUM_OBS).enumerate() {
            chunk.copy_from_slice(&self.row(i));
        }
    }

    #[must_use]
    pub fn to_row_major(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.num_envs() * NUM_OBS];
        self.write_row_major(&mut out);
        out
    }

    #[must_use]
    pub fn cart_pos(&self) -> &[f32] {
        &self.cart_pos
    }

    #[must_use]
    pub fn cart_vel(&self) -> &[f32] {
        &self.cart_vel
    }

    #[must_use]
    pub fn pole_angle(&self) -> &[f32] {
        &self.pole_angle
    }

    #[must_use]
    pub fn pole_vel(&self) -> &[f32] {
        &self.pole_vel
    }

    #[must_use]
    pub fn command(&self) -> &[f32] {
        &self.command
    }

    /// Borrows the columns the reward kernel reads.
    #[must_use]
    pub fn reward_inputs(&self) -> RewardInputs<'_> {
        RewardInputs {
            command: &self.command,
            pole_angle: &self.pole_angle,
            pole_vel: &self.pole_vel,
            cart_vel: &self.cart_vel,
            cart_pos: &self.cart_pos,
        }
    }
}
