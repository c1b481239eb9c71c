#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # Runtime
//!
//! Task driver and headless tooling around the commanded cart-pole:
//!
//! - [`task`]: the [`CartpoleCmdTask`](task::CartpoleCmdTask) step loop
//!   composing the `physics` batch with the `rl` episode evaluator.
//! - [`config`]: JSON task files.
//! - [`policy`] and [`stats`]: stand-in policies and episode bookkeeping for
//!   the headless runner in [`app`].
//! - [`plot`]: PNG line plots of scalar functions.

pub mod app;
pub mod config;
pub mod plot;
pub mod policy;
pub mod stats;
pub mod task;
