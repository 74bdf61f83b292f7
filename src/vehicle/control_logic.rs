use super::modes::Mode;
use crate::common::{Attitude, MotorCommand, StickCommand};
use crate::config::Config;
use crate::vehicle::attitude_control::AttitudeController;
use crate::vehicle::mixing::output_mixing;
use crate::vehicle::radio::radio_mapping;

/// Turn the current mode, attitude and sticks into motor duties.
///
/// In [`Mode::Safe`] the controllers are reset and the motors are off; nothing else runs.
/// In [`Mode::Active`] the PID outputs are scaled by the throttle authority before mixing,
/// so near idle the corrections stay gentle.
pub fn calculate_output(
    mode: Mode,
    attitude: &Attitude,
    stick: &StickCommand,
    duty: u8,
    dt: f32,
    controller: &mut AttitudeController,
    config: &Config,
) -> MotorCommand {
    match mode {
        Mode::Safe => {
            controller.reset();
            MotorCommand::OFF
        }
        Mode::Active => {
            let setpoints = radio_mapping(stick, &config.sticks);
            let correction = controller
                .update(attitude, &setpoints, dt)
                .scaled(config.throttle.authority(duty));
            let base = duty.max(config.throttle.idle_pwm) as f32;
            output_mixing(base, &correction, &config.mixer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PidGains;

    fn controller(config: &Config) -> AttitudeController {
        AttitudeController::new(config.roll, config.pitch, config.yaw_rate)
    }

    #[test]
    fn safe_mode_resets_and_stops() {
        let config = Config::default();
        let mut controller = controller(&config);
        let level = Attitude::default();
        let stick = StickCommand::new(0, 500, 800, 0);
        calculate_output(Mode::Active, &level, &stick, 200, 0.01, &mut controller, &config);

        let command =
            calculate_output(Mode::Safe, &level, &stick, 200, 0.01, &mut controller, &config);
        assert!(command.is_off());
        assert_eq!(controller.roll().last_terms().output, 0.0);
    }

    #[test]
    fn level_hover_is_symmetric() {
        let config = Config::default();
        let mut controller = controller(&config);
        let stick = StickCommand::new(0, 200, 0, 0);
        let command = calculate_output(
            Mode::Active,
            &Attitude::default(),
            &stick,
            150,
            0.01,
            &mut controller,
            &config,
        );
        assert_eq!(command.to_array(), [150; 4]);
    }

    #[test]
    fn authority_scales_corrections() {
        let mut config = Config::classic();
        config.roll = PidGains {
            kd: 0.0,
            ..config.roll
        };
        let mut controller = controller(&config);
        // 5 deg roll error * kp 3 = 15, times 102 / 255 = 6
        let stick = StickCommand::new(0, 0, 200, 0);
        let command = calculate_output(
            Mode::Active,
            &Attitude::default(),
            &stick,
            102,
            0.01,
            &mut controller,
            &config,
        );
        assert_eq!(command.to_array(), [108, 96, 96, 108]);
    }

    #[test]
    fn idle_floor_raises_base() {
        let mut config = Config::default();
        config.throttle.idle_pwm = 40;
        let mut controller = controller(&config);
        let command = calculate_output(
            Mode::Active,
            &Attitude::default(),
            &StickCommand::default(),
            10,
            0.01,
            &mut controller,
            &config,
        );
        assert_eq!(command.to_array(), [40; 4]);
    }
}
