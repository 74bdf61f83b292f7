use crate::common::MotorCommand;
use crate::config::MixerConfig;
use crate::vehicle::attitude_control::ControllerOutput;

/// Round to the nearest duty and saturate into `0..=255`.
pub fn saturate(value: f32) -> u8 {
    // NaN falls out of max() as 0
    (value.max(0.0).min(255.0) + 0.5) as u8
}

/// X-quad mix around a common base duty.
pub fn output_mixing(base: f32, correction: &ControllerOutput, signs: &MixerConfig) -> MotorCommand {
    let roll = signs.roll.apply(correction.roll);
    let pitch = signs.pitch.apply(correction.pitch);
    let yaw = signs.yaw.apply(correction.yaw);

    MotorCommand {
        front_left: saturate(base + roll + pitch - yaw),
        front_right: saturate(base - roll + pitch + yaw),
        rear_right: saturate(base - roll - pitch - yaw),
        rear_left: saturate(base + roll - pitch + yaw),
    }
}
