use crate::config::PidGains;

/// Floor on `dt` for error differencing
pub const DT_EPSILON: f32 = 1e-6;

/// Contributions of the last step, for telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidTerms {
    pub p: f32,
    pub i: f32,
    pub d: f32,
    /// Clamped sum
    pub output: f32,
}

/// PID loop with a clamped integrator.
///
/// The derivative either comes from an externally measured rate (derivative on measurement)
/// or from differencing the error between steps. The latter is zero on the first step after
/// [`PidController::reset`] since no previous error exists yet.
#[derive(Copy, Clone, Debug)]
pub struct PidController {
    gains: PidGains,
    integrator: f32,
    previous_error: f32,
    first: bool,
    last: PidTerms,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        PidController {
            gains,
            integrator: 0.0,
            previous_error: 0.0,
            first: true,
            last: PidTerms::default(),
        }
    }

    /// Replace the gains and clear all accumulated state.
    pub fn init(&mut self, gains: PidGains) {
        *self = PidController::new(gains);
    }

    pub fn reset(&mut self) {
        self.init(self.gains);
    }

    pub fn step(
        &mut self,
        setpoint: f32,
        measurement: f32,
        dt: f32,
        derivative_measurement: Option<f32>,
    ) -> f32 {
        let PidGains {
            kp,
            ki,
            kd,
            i_min,
            i_max,
            out_min,
            out_max,
        } = self.gains;

        let error = setpoint - measurement;
        let p = kp * error;

        self.integrator = (self.integrator + error * dt * ki).min(i_max).max(i_min);
        let i = self.integrator;

        let derivative = match derivative_measurement {
            Some(rate) => -rate,
            None if self.first => 0.0,
            None => (error - self.previous_error) / dt.max(DT_EPSILON),
        };
        let d = kd * derivative;

        self.previous_error = error;
        self.first = false;

        let output = (p + i + d).min(out_max).max(out_min);
        self.last = PidTerms { p, i, d, output };
        output
    }

    pub fn integrator(&self) -> f32 {
        self.integrator
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    pub fn last_terms(&self) -> &PidTerms {
        &self.last
    }
}
