#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Cart-Pole Physics
//!
//! A batched, CPU-only cart-pole simulator.
//!
//! Every environment is a cart on a frictionless slider with a pole hinged on
//! top. The batch exposes the same surface a GPU simulator would: a degree of
//! freedom (DOF) state buffer, an effort buffer written before each step, and
//! indexed writes used to reset individual environments.
//!
//! ## Key Components
//!
//! -   [`CartPoleBatch`]: DOF state and efforts for `num_envs` cart-poles,
//!     advanced together by [`CartPoleBatch::simulate`].
//! -   [`SimConfig`]: the `sim` section of a task file.
//! -   [`env_origins`]: world origins of the environments on a square grid.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{CartPoleBatch, SimConfig, NUM_DOF};
//!
//! let mut batch = CartPoleBatch::new(2, SimConfig::default())?;
//! let mut efforts = vec![0.0; 2 * NUM_DOF];
//! efforts[0] = 10.0; // push the first cart
//! batch.set_actuation_forces(&efforts)?;
//! batch.simulate();
//! assert!(batch.dof_vel()[0][0] > 0.0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod cartpole;
pub mod config;
pub mod error;
pub mod grid;
pub mod types;

pub use cartpole::{CartPoleBatch, CART_DOF, NUM_DOF, POLE_DOF};
pub use config::{SimConfig, UpAxis};
pub use error::PhysicsError;
pub use grid::env_origins;
pub use types::Vec3;
