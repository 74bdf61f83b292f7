#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
//! Onboard stabilization for a small X-quad receiver.
//!
//! Raw sticks and IMU samples go in, four motor duties come out, once per control tick. Motors
//! only spin while the craft is armed with the hold-to-arm gesture and the throttle is above
//! idle; everywhere else the output is all zeros.
//!
//! [`vehicle::Stabilizer`] is the per-tick pipeline. [`tasks::ControlTask`] hosts it as the one
//! control-loop task, fed through `embassy-sync` queues.

// This must go first so the logging macros are visible to every other module
mod fmt;

pub mod common;
pub mod config;
pub mod error;
pub mod tasks;
pub mod vehicle;

pub use common::{Attitude, InertialSample, MotorCommand, StickCommand};
pub use config::Config;
pub use error::ConfigError;
pub use vehicle::Stabilizer;
