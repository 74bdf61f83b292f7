use crate::common::{Attitude, InertialSample};

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Complementary filter over gyro integration and accelerometer tilt.
///
/// Roll and pitch follow the gyro over short horizons and bleed toward the accelerometer with
/// weight `1 - alpha`. Yaw has no absolute reference and is pure gyro integration.
#[derive(Clone, Debug)]
pub struct AttitudeEstimator {
    alpha: f32,
    first: bool,
    state: Attitude,
}

impl AttitudeEstimator {
    pub fn new(alpha: f32) -> Self {
        AttitudeEstimator {
            alpha: clamp_alpha(alpha),
            first: true,
            state: Attitude::default(),
        }
    }

    /// Reset the estimate. The next update bootstraps straight from the accelerometer.
    pub fn init(&mut self, alpha: f32) {
        *self = AttitudeEstimator::new(alpha);
        debug!("attitude estimator reset, alpha {}", self.alpha);
    }

    pub fn update(&mut self, sample: &InertialSample, dt: f32) -> Attitude {
        let (gx, gy, gz) = sample.rates;
        let roll_gyro = self.state.roll + gx * dt;
        let pitch_gyro = self.state.pitch + gy * dt;
        let yaw_gyro = self.state.yaw + gz * dt;

        let (roll_acc, pitch_acc) = accel_tilt(sample.acceleration);

        if self.first {
            self.state.roll = roll_acc;
            self.state.pitch = pitch_acc;
            self.state.yaw = 0.0;
            self.first = false;
        } else {
            let alpha = self.alpha;
            self.state.roll = alpha * roll_gyro + (1.0 - alpha) * roll_acc;
            self.state.pitch = alpha * pitch_gyro + (1.0 - alpha) * pitch_acc;
            self.state.yaw = yaw_gyro;
        }
        self.state.rates = sample.rates;
        self.state
    }

    pub fn state(&self) -> &Attitude {
        &self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Roll and pitch in degrees from the gravity vector. A zero vector reads as level.
fn accel_tilt((ax, ay, az): (f32, f32, f32)) -> (f32, f32) {
    let roll = libm::atan2f(ay, az) * RAD_TO_DEG;
    let pitch = libm::atan2f(-ax, libm::sqrtf(ay * ay + az * az)) * RAD_TO_DEG;
    (roll, pitch)
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        return 1.0;
    }
    alpha.min(1.0).max(0.0)
}
