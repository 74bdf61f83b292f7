//! Tuning surface of the stabilizer.
//!
//! Everything that differs between airframes lives here rather than in constants:
//! filter weight, PID gains and bounds, stick geometry, throttle polarity, arming gesture,
//! and the sign of each mixer axis. Two presets are provided, [`Config::default`] for the
//! floor-plus-linear authority curve with inverted pitch, and [`Config::classic`] for the
//! purely linear curve with every sign normal.

use embassy_time::Duration;

use crate::error::{Axis, ConfigError};

/// Polarity of a correction axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sign {
    #[default]
    Normal,
    Inverted,
}

impl Sign {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Sign::Normal => value,
            Sign::Inverted => -value,
        }
    }
}

/// Gains and clamp bounds of one PID loop.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub i_min: f32,
    pub i_max: f32,
    pub out_min: f32,
    pub out_max: f32,
}

impl PidGains {
    /// Roll and pitch angle loops
    pub const ANGLE: PidGains = PidGains {
        kp: 3.0,
        ki: 0.0,
        kd: 0.08,
        i_min: -50.0,
        i_max: 50.0,
        out_min: -200.0,
        out_max: 200.0,
    };

    /// Yaw rate loop
    pub const YAW_RATE: PidGains = PidGains {
        kp: 1.2,
        ki: 0.0,
        kd: 0.02,
        i_min: -50.0,
        i_max: 50.0,
        out_min: -200.0,
        out_max: 200.0,
    };

    pub fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        let values = [
            self.kp,
            self.ki,
            self.kd,
            self.i_min,
            self.i_max,
            self.out_min,
            self.out_max,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteGain(axis));
        }
        if self.i_min > self.i_max {
            return Err(ConfigError::InvertedIntegratorBounds(axis));
        }
        if self.out_min > self.out_max {
            return Err(ConfigError::InvertedOutputBounds(axis));
        }
        Ok(())
    }
}

/// Stick geometry and the physical limits the sticks map onto.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickConfig {
    /// Magnitudes at or below this read as centered (roll, pitch, yaw only)
    pub deadband: i16,
    /// Sticks span `-range..=range`
    pub range: i16,
    pub angle_limit_deg: f32,
    pub rate_limit_deg_s: f32,
}

impl Default for StickConfig {
    fn default() -> Self {
        StickConfig {
            deadband: 50,
            range: 1000,
            angle_limit_deg: 25.0,
            rate_limit_deg_s: 150.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThrottleConfig {
    /// Duty at full throttle stick
    pub pwm_max: u8,
    /// Map `+range` to zero duty and `-range` to `pwm_max`
    pub inverted: bool,
    /// Lowest base duty handed to the mixer while active
    pub idle_pwm: u8,
    /// Fraction of PID authority kept at zero throttle
    pub authority_floor: f32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        ThrottleConfig {
            pwm_max: u8::MAX,
            inverted: false,
            idle_pwm: 0,
            authority_floor: 0.6,
        }
    }
}

impl ThrottleConfig {
    /// Scale applied to every PID output at the given duty.
    pub fn authority(&self, duty: u8) -> f32 {
        self.authority_floor + (1.0 - self.authority_floor) * (duty as f32 / 255.0)
    }
}

/// Hold-to-arm gesture and the idle threshold of the safety gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmingConfig {
    /// Throttle stick at or below this counts as low
    pub low_throttle: i16,
    /// Yaw stick at or beyond +/- this completes a combo
    pub yaw_edge: i16,
    /// How long a combo must be held continuously
    pub hold: Duration,
    /// Motors stay off until throttle exceeds `low_throttle + gate_margin`
    pub gate_margin: i16,
}

impl Default for ArmingConfig {
    fn default() -> Self {
        ArmingConfig {
            low_throttle: -900,
            yaw_edge: 900,
            hold: Duration::from_millis(800),
            gate_margin: 50,
        }
    }
}

impl ArmingConfig {
    pub fn idle_threshold(&self) -> i32 {
        self.low_throttle as i32 + self.gate_margin as i32
    }
}

/// Sign of each correction fed into the X mix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MixerConfig {
    pub roll: Sign,
    pub pitch: Sign,
    pub yaw: Sign,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Complementary filter gyro weight, clamped into [0, 1]
    pub alpha: f32,
    pub roll: PidGains,
    pub pitch: PidGains,
    pub yaw_rate: PidGains,
    pub sticks: StickConfig,
    pub throttle: ThrottleConfig,
    pub arming: ArmingConfig,
    pub mixer: MixerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            alpha: 0.98,
            roll: PidGains::ANGLE,
            pitch: PidGains::ANGLE,
            yaw_rate: PidGains::YAW_RATE,
            sticks: StickConfig::default(),
            throttle: ThrottleConfig::default(),
            arming: ArmingConfig::default(),
            mixer: MixerConfig {
                roll: Sign::Normal,
                pitch: Sign::Inverted,
                yaw: Sign::Normal,
            },
        }
    }
}

impl Config {
    /// Linear authority (`duty / 255`) and no inverted axes.
    pub fn classic() -> Self {
        Config {
            throttle: ThrottleConfig {
                authority_floor: 0.0,
                ..ThrottleConfig::default()
            },
            mixer: MixerConfig::default(),
            ..Config::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.roll.validate(Axis::Roll)?;
        self.pitch.validate(Axis::Pitch)?;
        self.yaw_rate.validate(Axis::YawRate)?;

        let sticks = &self.sticks;
        if sticks.range <= 0 {
            return Err(ConfigError::InvalidStickRange);
        }
        if sticks.deadband < 0 || sticks.deadband >= sticks.range {
            return Err(ConfigError::DeadbandOutOfRange);
        }
        let limits = [sticks.angle_limit_deg, sticks.rate_limit_deg_s];
        if limits.iter().any(|l| !l.is_finite() || *l < 0.0) {
            return Err(ConfigError::InvalidLimit);
        }

        if !(0.0..=1.0).contains(&self.throttle.authority_floor) {
            return Err(ConfigError::AuthorityFloorOutOfRange);
        }

        let arming = &self.arming;
        let range = -sticks.range..=sticks.range;
        if !range.contains(&arming.low_throttle)
            || !range.contains(&arming.yaw_edge)
            || arming.yaw_edge <= 0
            || arming.gate_margin < 0
        {
            return Err(ConfigError::ArmingThresholdOutOfRange);
        }
        if arming.hold.as_ticks() == 0 {
            return Err(ConfigError::ZeroHoldDuration);
        }
        Ok(())
    }
}

/// Timing of the control task that hosts the stabilizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskConfig {
    /// `dt` used for the very first sample
    pub nominal_period: Duration,
    /// Stick commands older than this are replaced by a motors-off command
    pub link_timeout: Duration,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            nominal_period: Duration::from_millis(4),
            link_timeout: Duration::from_millis(500),
        }
    }
}

impl TaskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nominal_period.as_ticks() == 0 || self.link_timeout.as_ticks() == 0 {
            return Err(ConfigError::InvalidTiming);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn presets_are_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
        assert_eq!(Config::classic().validate(), Ok(()));
        assert_eq!(TaskConfig::default().validate(), Ok(()));
    }

    #[test]
    fn presets_differ_in_authority_and_pitch_sign() {
        let general = Config::default();
        let classic = Config::classic();
        assert_eq!(general.mixer.pitch, Sign::Inverted);
        assert_eq!(classic.mixer.pitch, Sign::Normal);
        assert_relative_eq!(general.throttle.authority(0), 0.6);
        assert_relative_eq!(classic.throttle.authority(0), 0.0);
        assert_relative_eq!(general.throttle.authority(255), 1.0);
        assert_relative_eq!(classic.throttle.authority(255), 1.0);
        assert_relative_eq!(classic.throttle.authority(51), 0.2);
    }

    #[test]
    fn sign_apply() {
        assert_eq!(Sign::Normal.apply(2.5), 2.5);
        assert_eq!(Sign::Inverted.apply(2.5), -2.5);
    }

    #[test]
    fn rejects_inverted_pid_bounds() {
        let mut config = Config::default();
        config.pitch.i_min = 10.0;
        config.pitch.i_max = -10.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedIntegratorBounds(Axis::Pitch))
        );

        let mut config = Config::default();
        config.yaw_rate.out_min = 1.0;
        config.yaw_rate.out_max = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedOutputBounds(Axis::YawRate))
        );

        let mut config = Config::default();
        config.roll.kd = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::NonFiniteGain(Axis::Roll)));
    }

    #[test]
    fn rejects_bad_stick_geometry() {
        let mut config = Config::default();
        config.sticks.range = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidStickRange));

        let mut config = Config::default();
        config.sticks.deadband = 1000;
        assert_eq!(config.validate(), Err(ConfigError::DeadbandOutOfRange));

        let mut config = Config::default();
        config.sticks.rate_limit_deg_s = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLimit));
    }

    #[test]
    fn rejects_bad_throttle_and_arming() {
        let mut config = Config::default();
        config.throttle.authority_floor = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::AuthorityFloorOutOfRange));

        let mut config = Config::default();
        config.arming.yaw_edge = 0;
        assert_eq!(config.validate(), Err(ConfigError::ArmingThresholdOutOfRange));

        let mut config = Config::default();
        config.arming.low_throttle = -1200;
        assert_eq!(config.validate(), Err(ConfigError::ArmingThresholdOutOfRange));

        let mut config = Config::default();
        config.arming.hold = Duration::from_ticks(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroHoldDuration));

        let task = TaskConfig {
            link_timeout: Duration::from_ticks(0),
            ..TaskConfig::default()
        };
        assert_eq!(task.validate(), Err(ConfigError::InvalidTiming));
    }

    #[test]
    fn idle_threshold_includes_margin() {
        assert_eq!(ArmingConfig::default().idle_threshold(), -850);
    }
}
