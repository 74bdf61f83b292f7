//! Configuration errors. The control path itself never fails.

use thiserror::Error;

/// Which PID loop a gain error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Roll,
    Pitch,
    YawRate,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Axis::Roll => f.write_str("roll"),
            Axis::Pitch => f.write_str("pitch"),
            Axis::YawRate => f.write_str("yaw rate"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("{0} PID integrator lower bound exceeds upper bound")]
    InvertedIntegratorBounds(Axis),

    #[error("{0} PID output lower bound exceeds upper bound")]
    InvertedOutputBounds(Axis),

    #[error("{0} PID gains or bounds are not finite")]
    NonFiniteGain(Axis),

    #[error("stick range must be positive")]
    InvalidStickRange,

    #[error("deadband must lie in 0..stick_range")]
    DeadbandOutOfRange,

    #[error("angle and rate limits must be finite and non-negative")]
    InvalidLimit,

    #[error("throttle authority floor must lie in [0, 1]")]
    AuthorityFloorOutOfRange,

    #[error("arming thresholds must lie inside the stick range")]
    ArmingThresholdOutOfRange,

    #[error("arming hold duration must be non-zero")]
    ZeroHoldDuration,

    #[error("control task periods must be non-zero")]
    InvalidTiming,
}
