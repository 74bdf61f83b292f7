use crate::common::Attitude;
use crate::config::PidGains;
use crate::vehicle::pid::{PidController, PidTerms};
use crate::vehicle::radio::Setpoints;

/// Axis corrections in duty units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerOutput {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl ControllerOutput {
    pub fn scaled(&self, factor: f32) -> Self {
        ControllerOutput {
            roll: self.roll * factor,
            pitch: self.pitch * factor,
            yaw: self.yaw * factor,
        }
    }
}

/// Roll and pitch angle loops plus the yaw rate loop.
#[derive(Copy, Clone, Debug)]
pub struct AttitudeController {
    roll: PidController,
    pitch: PidController,
    yaw_rate: PidController,
}

impl AttitudeController {
    pub fn new(roll: PidGains, pitch: PidGains, yaw_rate: PidGains) -> Self {
        AttitudeController {
            roll: PidController::new(roll),
            pitch: PidController::new(pitch),
            yaw_rate: PidController::new(yaw_rate),
        }
    }

    pub fn reset(&mut self) {
        self.roll.reset();
        self.pitch.reset();
        self.yaw_rate.reset();
    }

    pub fn update(&mut self, attitude: &Attitude, setpoints: &Setpoints, dt: f32) -> ControllerOutput {
        let (roll_rate, pitch_rate, yaw_rate) = attitude.rates;

        // Angle loops damp on the gyro rate instead of the error difference
        let roll = self
            .roll
            .step(setpoints.roll_deg, attitude.roll, dt, Some(roll_rate));
        let pitch = self
            .pitch
            .step(setpoints.pitch_deg, attitude.pitch, dt, Some(pitch_rate));
        let yaw = self
            .yaw_rate
            .step(setpoints.yaw_rate_deg_s, yaw_rate, dt, None);

        ControllerOutput { roll, pitch, yaw }
    }

    pub fn roll(&self) -> &PidController {
        &self.roll
    }

    pub fn pitch(&self) -> &PidController {
        &self.pitch
    }

    pub fn yaw_rate(&self) -> &PidController {
        &self.yaw_rate
    }

    /// Roll, pitch and yaw rate terms of the last update
    pub fn terms(&self) -> [PidTerms; 3] {
        [
            *self.roll.last_terms(),
            *self.pitch.last_terms(),
            *self.yaw_rate.last_terms(),
        ]
    }
}
