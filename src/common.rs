/// Raw pilot sticks, each axis in `-stick_range..=stick_range` with `0` at center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickCommand {
    /// Left stick X, yaw rate demand
    pub yaw: i16,
    /// Left stick Y, throttle demand
    pub throttle: i16,
    /// Right stick X, roll demand
    pub roll: i16,
    /// Right stick Y, pitch demand
    pub pitch: i16,
}

impl StickCommand {
    pub const fn new(yaw: i16, throttle: i16, roll: i16, pitch: i16) -> Self {
        StickCommand {
            yaw,
            throttle,
            roll,
            pitch,
        }
    }
}

/// One calibrated IMU reading. Acceleration in any consistent unit, rates in deg/s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InertialSample {
    pub acceleration: (f32, f32, f32),
    pub rates: (f32, f32, f32),
}

/// Estimated attitude in degrees.
///
/// Roll and pitch come from the gravity vector and are only meaningful in slow flight.
/// Yaw is integrated from the gyro alone and drifts without bound.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    /// Signed angular rates (deg/s) of the sample that produced this estimate
    pub rates: (f32, f32, f32),
}

/// Motor duty values in X-quad order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    pub front_left: u8,
    pub front_right: u8,
    pub rear_right: u8,
    pub rear_left: u8,
}

impl MotorCommand {
    pub const OFF: MotorCommand = MotorCommand {
        front_left: 0,
        front_right: 0,
        rear_right: 0,
        rear_left: 0,
    };

    pub const fn to_array(&self) -> [u8; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_right,
            self.rear_left,
        ]
    }

    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }
}

pub enum Update<T> {
    Unchanged(T),
    Updated(T),
}

impl<T> Update<T> {
    pub fn value(&self) -> &T {
        match self {
            Update::Unchanged(data) => data,
            Update::Updated(data) => data,
        }
    }

    pub fn updated(&self) -> Option<&T> {
        match self {
            Update::Unchanged(_) => None,
            Update::Updated(data) => Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_command_array_order() {
        let command = MotorCommand {
            front_left: 1,
            front_right: 2,
            rear_right: 3,
            rear_left: 4,
        };
        assert_eq!(command.to_array(), [1, 2, 3, 4]);
        assert!(!command.is_off());
        assert!(MotorCommand::OFF.is_off());
    }

    #[test]
    fn update_exposes_value_either_way() {
        let fresh = Update::Updated(7);
        let stale = Update::Unchanged(7);
        assert_eq!(fresh.value(), stale.value());
        assert_eq!(fresh.updated(), Some(&7));
        assert_eq!(stale.updated(), None);
    }
}
