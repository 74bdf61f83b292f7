use crate::common::StickCommand;
use crate::config::{StickConfig, ThrottleConfig};

/// Physical demands derived from the sticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoints {
    pub roll_deg: f32,
    pub pitch_deg: f32,
    pub yaw_rate_deg_s: f32,
}

pub fn deadband(value: i16, deadband: i16) -> i16 {
    if value.unsigned_abs() <= deadband.unsigned_abs() {
        0
    } else {
        value
    }
}

/// Center noisy roll, pitch and yaw sticks. Throttle passes through untouched.
pub fn apply_deadband(stick: &StickCommand, config: &StickConfig) -> StickCommand {
    StickCommand {
        yaw: deadband(stick.yaw, config.deadband),
        throttle: stick.throttle,
        roll: deadband(stick.roll, config.deadband),
        pitch: deadband(stick.pitch, config.deadband),
    }
}

fn clamp_stick(value: i16, range: i16) -> i32 {
    let range = range as i32;
    (value as i32).min(range).max(-range)
}

fn scale(value: i16, config: &StickConfig, limit: f32) -> f32 {
    clamp_stick(value, config.range) as f32 * limit / config.range as f32
}

pub fn radio_mapping(stick: &StickCommand, config: &StickConfig) -> Setpoints {
    let stick = apply_deadband(stick, config);
    Setpoints {
        roll_deg: scale(stick.roll, config, config.angle_limit_deg),
        pitch_deg: scale(stick.pitch, config, config.angle_limit_deg),
        yaw_rate_deg_s: scale(stick.yaw, config, config.rate_limit_deg_s),
    }
}

/// Throttle stick with physical polarity corrected, so the low end always reads negative.
///
/// Arming and the motor gate both read this value.
pub fn throttle_level(throttle_stick: i16, throttle: &ThrottleConfig) -> i16 {
    if throttle.inverted {
        throttle_stick.saturating_neg()
    } else {
        throttle_stick
    }
}

/// Linear throttle duty in `0..=pwm_max`, optionally with reversed stick polarity.
pub fn throttle_duty(throttle_stick: i16, sticks: &StickConfig, throttle: &ThrottleConfig) -> u8 {
    let range = sticks.range as i32;
    let shifted = clamp_stick(throttle_level(throttle_stick, throttle), sticks.range) + range;
    let pwm_max = throttle.pwm_max as i32;
    let duty = shifted * pwm_max / (2 * range);
    duty.min(pwm_max).max(0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn deadband_zeroes_small_values() {
        assert_eq!(deadband(50, 50), 0);
        assert_eq!(deadband(-50, 50), 0);
        assert_eq!(deadband(51, 50), 51);
        assert_eq!(deadband(-51, 50), -51);
        assert_eq!(deadband(i16::MIN, 50), i16::MIN);
    }

    #[test]
    fn deadband_leaves_throttle_alone() {
        let config = StickConfig::default();
        let stick = StickCommand::new(20, 20, -30, 40);
        assert_eq!(
            apply_deadband(&stick, &config),
            StickCommand::new(0, 20, 0, 0)
        );
    }

    #[test]
    fn full_deflection_reaches_limits() {
        let config = StickConfig::default();
        let setpoints = radio_mapping(&StickCommand::new(-1000, 0, 1000, -1000), &config);
        assert_relative_eq!(setpoints.roll_deg, 25.0);
        assert_relative_eq!(setpoints.pitch_deg, -25.0);
        assert_relative_eq!(setpoints.yaw_rate_deg_s, -150.0);
    }

    #[test]
    fn linear_between_center_and_edge() {
        let config = StickConfig::default();
        let setpoints = radio_mapping(&StickCommand::new(500, 0, 200, 0), &config);
        assert_relative_eq!(setpoints.roll_deg, 5.0);
        assert_relative_eq!(setpoints.yaw_rate_deg_s, 75.0);
        assert_eq!(setpoints.pitch_deg, 0.0);
    }

    #[test]
    fn out_of_range_sticks_are_clamped() {
        let config = StickConfig::default();
        let setpoints = radio_mapping(&StickCommand::new(i16::MIN, 0, 4000, i16::MAX), &config);
        assert_relative_eq!(setpoints.roll_deg, 25.0);
        assert_relative_eq!(setpoints.pitch_deg, 25.0);
        assert_relative_eq!(setpoints.yaw_rate_deg_s, -150.0);
    }

    #[test]
    fn throttle_polarity() {
        let sticks = StickConfig::default();
        let normal = ThrottleConfig::default();
        let inverted = ThrottleConfig {
            inverted: true,
            ..ThrottleConfig::default()
        };

        assert_eq!(throttle_duty(1000, &sticks, &normal), 255);
        assert_eq!(throttle_duty(-1000, &sticks, &normal), 0);
        assert_eq!(throttle_duty(1000, &sticks, &inverted), 0);
        assert_eq!(throttle_duty(-1000, &sticks, &inverted), 255);
        assert_eq!(throttle_duty(0, &sticks, &normal), 127);
    }

    #[test]
    fn throttle_level_follows_polarity() {
        let normal = ThrottleConfig::default();
        let inverted = ThrottleConfig {
            inverted: true,
            ..ThrottleConfig::default()
        };
        assert_eq!(throttle_level(-1000, &normal), -1000);
        assert_eq!(throttle_level(1000, &inverted), -1000);
        assert_eq!(throttle_level(-849, &inverted), 849);
        assert_eq!(throttle_level(i16::MIN, &inverted), i16::MAX);
    }

    #[test]
    fn throttle_is_clamped_and_scaled() {
        let sticks = StickConfig::default();
        let throttle = ThrottleConfig {
            pwm_max: 200,
            ..ThrottleConfig::default()
        };
        assert_eq!(throttle_duty(i16::MAX, &sticks, &throttle), 200);
        assert_eq!(throttle_duty(i16::MIN, &sticks, &throttle), 0);
        assert_eq!(throttle_duty(i16::MAX, &sticks, &ThrottleConfig::default()), 255);
    }
}
