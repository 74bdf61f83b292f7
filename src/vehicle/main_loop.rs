use embassy_time::Instant;

use crate::common::{Attitude, InertialSample, MotorCommand, StickCommand};
use crate::config::{Config, PidGains};
use crate::error::{Axis, ConfigError};
use crate::vehicle::ahrs::AttitudeEstimator;
use crate::vehicle::arming::ArmingStateMachine;
use crate::vehicle::attitude_control::AttitudeController;
use crate::vehicle::control_logic::calculate_output;
use crate::vehicle::modes::{update_mode, Mode};
use crate::vehicle::radio::{apply_deadband, throttle_duty, throttle_level};

/// The stabilization pipeline.
///
/// Owns the attitude filter, the three PID loops and the arming state. [`Stabilizer::tick`]
/// must be called once per control period from a single context.
///
/// # Safety gate
///
/// Motors only receive non-zero duty while armed with the throttle stick above
/// `low_throttle + gate_margin`. The gate is re-evaluated on every tick, so a disarm or
/// throttle chop zeroes the output on the same tick and resets the PID loops.
pub struct Stabilizer {
    config: Config,
    ahrs: AttitudeEstimator,
    controller: AttitudeController,
    arming: ArmingStateMachine,
    attitude: Attitude,
    mode: Mode,
}

impl Stabilizer {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "stabilizer config accepted, alpha {} authority floor {}",
            config.alpha,
            config.throttle.authority_floor
        );
        Ok(Stabilizer {
            config,
            ahrs: AttitudeEstimator::new(config.alpha),
            controller: AttitudeController::new(config.roll, config.pitch, config.yaw_rate),
            arming: ArmingStateMachine::new(config.arming),
            attitude: Attitude::default(),
            mode: Mode::Safe,
        })
    }

    /// Install new filter weight and gains, then return to the disarmed, bootstrapping state.
    pub fn init(
        &mut self,
        alpha: f32,
        roll: PidGains,
        pitch: PidGains,
        yaw_rate: PidGains,
    ) -> Result<(), ConfigError> {
        roll.validate(Axis::Roll)?;
        pitch.validate(Axis::Pitch)?;
        yaw_rate.validate(Axis::YawRate)?;

        self.ahrs.init(alpha);
        self.config.alpha = self.ahrs.alpha();
        self.config.roll = roll;
        self.config.pitch = pitch;
        self.config.yaw_rate = yaw_rate;
        self.controller = AttitudeController::new(roll, pitch, yaw_rate);
        self.arming.init();
        self.attitude = Attitude::default();
        self.mode = Mode::Safe;
        debug!("stabilizer initialised");
        Ok(())
    }

    pub fn tick(
        &mut self,
        stick: &StickCommand,
        sample: &InertialSample,
        dt: f32,
        now: Instant,
    ) -> MotorCommand {
        let config = &self.config;
        let shaped = apply_deadband(stick, &config.sticks);

        let throttle = throttle_level(stick.throttle, &config.throttle);

        let armed = self.arming.update(throttle, stick.yaw, now);
        self.attitude = self.ahrs.update(sample, dt);
        let duty = throttle_duty(stick.throttle, &config.sticks, &config.throttle);

        update_mode(&mut self.mode, armed, throttle, &config.arming);

        calculate_output(
            self.mode,
            &self.attitude,
            &shaped,
            duty,
            dt,
            &mut self.controller,
            config,
        )
    }

    pub fn armed(&self) -> bool {
        self.arming.armed()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn attitude(&self) -> &Attitude {
        &self.attitude
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &AttitudeController {
        &self.controller
    }
}
